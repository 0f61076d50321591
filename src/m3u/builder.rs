use std::collections::BTreeMap;

use super::{
    classifier::LineType,
    directive::{ExtInfExtractor, OptionRule},
};
use crate::channel::{Channel, Group, MediaType, Tvg};

/// A channel whose definition line has been read but whose URI has not.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChannel {
    pub name: String,
    pub duration: f64,
    pub tvg: Tvg,
    pub group: Group,
    pub attributes: BTreeMap<String, String>,
}

impl PendingChannel {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            duration: -1.0,
            tvg: Tvg::default(),
            group: Group::default(),
            attributes: BTreeMap::new(),
        }
    }

    /// Store an attribute. Empty values are ignored.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.attributes.insert(key.into(), value);
        }
    }

    /// Attach the stream URI and finish the record.
    pub fn complete(self, url: &str) -> Channel {
        Channel {
            name: self.name,
            url: url.to_string(),
            media_type: MediaType::from_url(url),
            duration: self.duration,
            tvg: self.tvg,
            group: self.group,
            attributes: self.attributes,
        }
    }
}

impl Default for PendingChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder state between lines.
#[derive(Debug, Clone, PartialEq)]
pub enum BuilderState {
    Idle,
    /// An `#EXTINF` was seen on `line`; awaiting its URI.
    Collecting { line: usize, channel: PendingChannel },
}

/// Definition dropped because no URI followed it.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedDefinition {
    pub line: usize,
    pub name: String,
}

/// Accumulates directive lines into complete channels.
pub struct ChannelBuilder {
    state: BuilderState,
    rules: Vec<Box<dyn OptionRule>>,
    emitted: usize,
    dropped: Vec<DroppedDefinition>,
}

impl ChannelBuilder {
    pub fn new(rules: Vec<Box<dyn OptionRule>>) -> Self {
        Self {
            state: BuilderState::Idle,
            rules,
            emitted: 0,
            dropped: Vec::new(),
        }
    }

    /// Feed one classified line; returns a channel when its URI completes it.
    pub fn feed(&mut self, line_no: usize, line_type: LineType, line: &str) -> Option<Channel> {
        match line_type {
            LineType::ChannelDefinition => {
                let channel = ExtInfExtractor::extract(line, self.emitted);
                let previous = std::mem::replace(
                    &mut self.state,
                    BuilderState::Collecting {
                        line: line_no,
                        channel,
                    },
                );
                self.drop_unterminated(previous);
                None
            }
            LineType::UriCandidate => {
                match std::mem::replace(&mut self.state, BuilderState::Idle) {
                    BuilderState::Collecting { channel, .. } => {
                        self.emitted += 1;
                        Some(channel.complete(line.trim()))
                    }
                    BuilderState::Idle => None,
                }
            }
            kind if kind.is_option() => {
                if let BuilderState::Collecting { channel, .. } = &mut self.state {
                    for rule in &self.rules {
                        if rule.matches(&kind) {
                            rule.apply(line, channel);
                        }
                    }
                }
                None
            }
            _ => None,
        }
    }

    /// End of input. Returns every definition that never received a URI.
    pub fn finish(mut self) -> Vec<DroppedDefinition> {
        let last = std::mem::replace(&mut self.state, BuilderState::Idle);
        self.drop_unterminated(last);
        self.dropped
    }

    fn drop_unterminated(&mut self, state: BuilderState) {
        if let BuilderState::Collecting { line, channel } = state {
            tracing::debug!(
                "Dropping channel definition without URI at line {}: {}",
                line,
                channel.name
            );
            self.dropped.push(DroppedDefinition {
                line,
                name: channel.name,
            });
        }
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    /// Number of channels completed so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}
