//! The set of loaded playlists and their merged channel list.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    channel::Channel,
    m3u::PlaylistParser,
    merge::merge_playlists,
    playlist::{Playlist, PlaylistSummary},
    proxy::ProxyClient,
    source::{naming, DefaultPlaylist, PlaylistSource, DEFAULT_PLAYLISTS},
    Error, Result,
};

/// A source to load, with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceSpec {
    pub source: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl SourceSpec {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            name: None,
        }
    }

    pub fn named(source: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            name: Some(name.into()),
        }
    }
}

impl From<&DefaultPlaylist> for SourceSpec {
    fn from(default: &DefaultPlaylist) -> Self {
        Self::named(default.url, default.name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub error: String,
}

/// Outcome of loading a batch of sources.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadSummary {
    pub loaded: Vec<PlaylistSummary>,
    pub failed: Vec<SourceFailure>,
}

/// Specs for the built-in sources.
pub fn default_specs() -> Vec<SourceSpec> {
    DEFAULT_PLAYLISTS.iter().map(SourceSpec::from).collect()
}

/// Acquire and parse one source. The name is left blank when neither the
/// spec nor the source provides one; [`Library::extend`] numbers it.
pub async fn load_playlist(client: &ProxyClient, spec: &SourceSpec) -> Result<Playlist> {
    let source = PlaylistSource::parse(&spec.source)?;
    let text = source.acquire(client).await?;

    let report = PlaylistParser::new().parse(&text);
    for diagnostic in &report.diagnostics {
        tracing::warn!("{}: {}", source, diagnostic);
    }

    if report.channels.is_empty() {
        return Err(Error::EmptyPlaylist(source.location()));
    }

    let name = spec
        .name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| source.default_name());

    tracing::info!(
        "Loaded playlist '{}' with {} channels from {}",
        name,
        report.channels.len(),
        source
    );

    Ok(Playlist::new(name, source.location(), report.channels))
}

/// Load every source concurrently. Results keep the order of `specs`
/// regardless of completion order; failures are collected, not propagated.
pub async fn load_all(
    client: &ProxyClient,
    specs: &[SourceSpec],
) -> (Vec<Playlist>, Vec<SourceFailure>) {
    let results = join_all(specs.iter().map(|spec| load_playlist(client, spec))).await;

    let mut playlists = Vec::new();
    let mut failed = Vec::new();

    for (spec, result) in specs.iter().zip(results) {
        match result {
            Ok(playlist) => playlists.push(playlist),
            Err(e) => {
                tracing::warn!("Failed to load playlist {}: {}", spec.source, e);
                failed.push(SourceFailure {
                    source: spec.source.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    if !playlists.is_empty() && !failed.is_empty() {
        tracing::warn!(
            "Loaded {} playlists successfully. {} failed to load.",
            playlists.len(),
            failed.len()
        );
    }

    (playlists, failed)
}

/// Ordered playlists plus the channel list merged from them.
#[derive(Debug, Default)]
pub struct Library {
    playlists: Vec<Playlist>,
    channels: Vec<Channel>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    pub fn summaries(&self) -> Vec<PlaylistSummary> {
        self.playlists.iter().map(PlaylistSummary::from).collect()
    }

    /// Merged, deduplicated and sorted channels.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn get(&self, id: Uuid) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Append a playlist and re-merge.
    pub fn add_playlist(&mut self, playlist: Playlist) -> PlaylistSummary {
        self.extend(vec![playlist]).remove(0)
    }

    /// Append playlists in order and re-merge once. A blank name becomes
    /// `"Playlist <n>"`, `n` being the playlist's position in the library.
    pub fn extend(&mut self, playlists: Vec<Playlist>) -> Vec<PlaylistSummary> {
        if playlists.is_empty() {
            return Vec::new();
        }

        let mut summaries = Vec::with_capacity(playlists.len());
        for mut playlist in playlists {
            playlist.name = naming::or_numbered(playlist.name, self.playlists.len() + 1);
            summaries.push(PlaylistSummary::from(&playlist));
            self.playlists.push(playlist);
        }

        self.remerge();
        summaries
    }

    pub fn remove_playlist(&mut self, id: Uuid) -> Result<Playlist> {
        let position = self
            .playlists
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::PlaylistNotFound(id.to_string()))?;

        let removed = self.playlists.remove(position);
        tracing::info!("Removed playlist: {}", removed.name);
        self.remerge();
        Ok(removed)
    }

    fn remerge(&mut self) {
        self.channels = merge_playlists(&self.playlists);
        tracing::info!(
            "Merged {} playlists into {} channels",
            self.playlists.len(),
            self.channels.len()
        );
    }
}
