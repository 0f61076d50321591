//! Cross-playlist deduplication and ordering.
//!
//! Channels are identified by `name` alone. The first occurrence keeps its
//! `url` and `media_type`; later duplicates only contribute header attributes
//! and fill a missing logo or group.

pub mod collate;

pub use collate::locale_cmp;

use std::collections::HashMap;

use crate::{channel::Channel, playlist::Playlist};

/// Merges channels from several playlists into one sorted list.
pub struct MergeEngine {
    merged: Vec<Channel>,
    positions: HashMap<String, usize>,
}

impl MergeEngine {
    pub fn new() -> Self {
        Self {
            merged: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Absorb one playlist's channels, in order.
    pub fn add_playlist(&mut self, playlist: &Playlist) {
        tracing::debug!(
            "Merging playlist '{}' ({} channels) from {}",
            playlist.name,
            playlist.channels.len(),
            playlist.source
        );
        self.add_channels(&playlist.channels);
    }

    pub fn add_channels<'a>(&mut self, channels: impl IntoIterator<Item = &'a Channel>) {
        for channel in channels {
            self.absorb(channel);
        }
    }

    fn absorb(&mut self, channel: &Channel) {
        let Some(&position) = self.positions.get(&channel.name) else {
            self.positions
                .insert(channel.name.clone(), self.merged.len());
            self.merged.push(channel.clone());
            return;
        };

        let existing = &mut self.merged[position];

        for (key, value) in &channel.attributes {
            if !value.is_empty() {
                existing.attributes.insert(key.clone(), value.clone());
            }
        }

        if is_blank(&existing.tvg.logo) && !is_blank(&channel.tvg.logo) {
            existing.tvg.logo = channel.tvg.logo.clone();
        }

        if is_blank(&existing.group.title) && !is_blank(&channel.group.title) {
            existing.group = channel.group.clone();
        }
    }

    /// Sort by group title (absent as `"Uncategorized"`), then by name.
    pub fn finish(mut self) -> Vec<Channel> {
        self.merged.sort_by(|a, b| {
            locale_cmp(a.group_title(), b.group_title()).then_with(|| locale_cmp(&a.name, &b.name))
        });

        for channel in &self.merged {
            let headers: Vec<String> = channel
                .attributes
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            if !headers.is_empty() {
                tracing::debug!(
                    "Headers for channel \"{}\": {}",
                    channel.name,
                    headers.join(", ")
                );
            }
        }

        self.merged
    }
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Merge playlists in the given order.
pub fn merge_playlists<'a>(playlists: impl IntoIterator<Item = &'a Playlist>) -> Vec<Channel> {
    let mut engine = MergeEngine::new();
    for playlist in playlists {
        engine.add_playlist(playlist);
    }
    engine.finish()
}
