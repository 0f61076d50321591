use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::channel::Channel;

/// One ingested playlist source and its parsed channels.
#[derive(Debug, Clone, Serialize)]
pub struct Playlist {
    pub id: Uuid,
    pub name: String,
    /// URL or file path the text was acquired from.
    pub source: String,
    pub channels: Vec<Channel>,
    pub loaded_at: DateTime<Utc>,
}

impl Playlist {
    pub fn new(name: impl Into<String>, source: impl Into<String>, channels: Vec<Channel>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            source: source.into(),
            channels,
            loaded_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Listing view of a playlist, without its channels.
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistSummary {
    pub id: Uuid,
    pub name: String,
    pub source: String,
    pub channel_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl From<&Playlist> for PlaylistSummary {
    fn from(playlist: &Playlist) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name.clone(),
            source: playlist.source.clone(),
            channel_count: playlist.channels.len(),
            loaded_at: playlist.loaded_at,
        }
    }
}
