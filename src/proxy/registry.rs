use std::collections::HashMap;
use url::Url;

use crate::channel::Channel;

/// Outbound header overrides keyed by stream URL.
///
/// Lookups try the exact URL, then its origin and path without query or
/// fragment, then the longest registered URL (query removed) that prefixes
/// the request URL. Segment and variant requests under a registered stream
/// resolve through the prefix rule.
#[derive(Debug, Default, Clone)]
pub struct HeaderRegistry {
    entries: Vec<(String, HashMap<String, String>)>,
    positions: HashMap<String, usize>,
}

impl HeaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a merged channel list.
    pub fn from_channels(channels: &[Channel]) -> Self {
        let mut registry = Self::new();
        registry.register_channels(channels);
        registry
    }

    /// Store headers for `url`, replacing any earlier set. Empty values are
    /// dropped; a set left empty is not stored.
    pub fn register(&mut self, url: &str, headers: HashMap<String, String>) {
        let headers: HashMap<String, String> = headers
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect();

        if let Some(&position) = self.positions.get(url) {
            self.entries[position].1 = headers;
            return;
        }

        if headers.is_empty() {
            return;
        }

        self.positions.insert(url.to_string(), self.entries.len());
        self.entries.push((url.to_string(), headers));
    }

    /// Register each channel's transport headers under its URL. Returns the
    /// number of channels that had any.
    pub fn register_channels(&mut self, channels: &[Channel]) -> usize {
        let mut count = 0;
        for channel in channels {
            let headers = channel.stream_headers();
            if !headers.is_empty() {
                self.register(&channel.url, headers);
                count += 1;
            }
        }
        tracing::debug!("Registered headers for {} channels", count);
        count
    }

    pub fn resolve(&self, url: &str) -> Option<&HashMap<String, String>> {
        if let Some(&position) = self.positions.get(url) {
            return self.non_empty(position);
        }

        if let Some(position) = origin_and_path(url).and_then(|base| self.positions.get(&base)) {
            return self.non_empty(*position);
        }

        let mut best: Option<(usize, usize)> = None;
        for (position, (stored, headers)) in self.entries.iter().enumerate() {
            if headers.is_empty() {
                continue;
            }
            let base = strip_query(stored);
            if base.is_empty() || !url.starts_with(base) {
                continue;
            }
            if best.is_none_or(|(_, len)| base.len() > len) {
                best = Some((position, base.len()));
            }
        }

        best.map(|(position, _)| &self.entries[position].1)
    }

    fn non_empty(&self, position: usize) -> Option<&HashMap<String, String>> {
        Some(&self.entries[position].1).filter(|headers| !headers.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn origin_and_path(url: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    parsed.set_query(None);
    parsed.set_fragment(None);
    Some(parsed.to_string())
}

fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}
