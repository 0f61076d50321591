use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    config::Config,
    library::{self, LoadSummary, Library, SourceSpec},
    playlist::PlaylistSummary,
    proxy::{HeaderRegistry, ProxyClient},
    source::PlaylistSource,
    Error, Result,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub client: ProxyClient,
    pub library: Arc<RwLock<Library>>,
    pub headers: Arc<RwLock<HeaderRegistry>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let client = ProxyClient::from_config(&config)?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: Config, client: ProxyClient) -> Self {
        Self {
            client,
            library: Arc::new(RwLock::new(Library::new())),
            headers: Arc::new(RwLock::new(HeaderRegistry::new())),
            config: Arc::new(config),
        }
    }

    /// Load a batch of sources. Fetching happens outside the library lock.
    pub async fn load_sources(&self, specs: &[SourceSpec]) -> LoadSummary {
        let (playlists, failed) = library::load_all(&self.client, specs).await;

        let mut library = self.library.write().await;
        let loaded = library.extend(playlists);
        self.refresh_headers(&library).await;

        LoadSummary { loaded, failed }
    }

    /// Load the built-in sources, unless playlists are already present.
    pub async fn load_defaults(&self) -> LoadSummary {
        if !self.library.read().await.is_empty() {
            tracing::debug!("Playlists already loaded; skipping defaults");
            return LoadSummary::default();
        }

        self.load_sources(&library::default_specs()).await
    }

    /// Load one source on behalf of an API caller; its error is the caller's.
    /// Local files are refused unless the configuration allows them.
    pub async fn add_source(&self, spec: &SourceSpec) -> Result<PlaylistSummary> {
        let source = PlaylistSource::parse(&spec.source)?;
        if matches!(source, PlaylistSource::File(_)) && !self.config.allow_file_sources {
            tracing::warn!("Refusing file source: {}", spec.source);
            return Err(Error::SourceNotAllowed(spec.source.clone()));
        }

        let playlist = library::load_playlist(&self.client, spec).await?;

        let mut library = self.library.write().await;
        let summary = library.add_playlist(playlist);
        self.refresh_headers(&library).await;

        Ok(summary)
    }

    pub async fn remove_playlist(&self, id: Uuid) -> Result<PlaylistSummary> {
        let mut library = self.library.write().await;
        let removed = library.remove_playlist(id)?;
        self.refresh_headers(&library).await;

        Ok(PlaylistSummary::from(&removed))
    }

    /// Configured sources first, then the built-in ones if still empty.
    pub async fn load_startup_playlists(&self) {
        if !self.config.playlists.is_empty() {
            let specs: Vec<SourceSpec> = self
                .config
                .playlists
                .iter()
                .map(SourceSpec::new)
                .collect();
            let summary = self.load_sources(&specs).await;
            tracing::info!(
                "Startup playlists: {} loaded, {} failed",
                summary.loaded.len(),
                summary.failed.len()
            );
        }

        if self.config.load_defaults {
            let summary = self.load_defaults().await;
            if !summary.loaded.is_empty() || !summary.failed.is_empty() {
                tracing::info!(
                    "Default playlists: {} loaded, {} failed",
                    summary.loaded.len(),
                    summary.failed.len()
                );
            }
        }
    }

    async fn refresh_headers(&self, library: &Library) {
        *self.headers.write().await = HeaderRegistry::from_channels(library.channels());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use std::path::PathBuf;

    const LIST: &str = "#EXTM3U\n#EXTINF:-1 http-referrer=\"http://r/\",Fox\nhttp://a/fox.m3u8\n";

    struct TempPlaylist(PathBuf);

    impl TempPlaylist {
        fn new(content: &str) -> Self {
            let path = std::env::temp_dir().join(format!("zapper-state-{}.m3u", Uuid::new_v4()));
            std::fs::write(&path, content).unwrap();
            Self(path)
        }

        fn spec(&self) -> SourceSpec {
            SourceSpec::new(self.0.display().to_string())
        }
    }

    impl Drop for TempPlaylist {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    fn state(config: Config) -> AppState {
        AppState::with_client(
            config,
            ProxyClient::with_client(reqwest::Client::new(), "Test"),
        )
    }

    #[tokio::test]
    async fn test_load_sources_refreshes_headers() {
        let file = TempPlaylist::new(LIST);
        let state = state(Config::default());

        let summary = state
            .load_sources(&[SourceSpec::new("/nonexistent/zapper.m3u"), file.spec()])
            .await;

        assert_eq!(summary.loaded.len(), 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].source, "/nonexistent/zapper.m3u");

        let registry = state.headers.read().await;
        let headers = registry.resolve("http://a/fox.m3u8").unwrap();
        assert_eq!(headers.get("Referer").unwrap(), "http://r/");
    }

    #[tokio::test]
    async fn test_defaults_skipped_after_configured_sources() {
        let file = TempPlaylist::new(LIST);
        let mut config = Config::default();
        config.playlists = vec![file.0.display().to_string()];
        let state = state(config);

        state.load_startup_playlists().await;

        let summary = state.load_defaults().await;
        assert!(summary.loaded.is_empty());
        assert!(summary.failed.is_empty());
        assert_eq!(state.library.read().await.playlists().len(), 1);
    }

    #[tokio::test]
    async fn test_file_sources_need_permission() {
        let file = TempPlaylist::new(LIST);

        let denied = state(Config::default());
        assert!(matches!(
            denied.add_source(&file.spec()).await,
            Err(Error::SourceNotAllowed(_))
        ));
        assert!(denied.library.read().await.is_empty());

        let mut config = Config::default();
        config.allow_file_sources = true;
        let allowed = state(config);
        let summary = allowed.add_source(&file.spec()).await.unwrap();
        assert_eq!(summary.channel_count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_adds_get_distinct_numbers() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let app = Router::new().route("/list.m3u", get(|| async { LIST }));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let state = state(Config::default());
        // No second-level host label and a playlist file name: the name is blank.
        let spec = SourceSpec::new(format!("http://localhost:{}/list.m3u", port));

        let (first, second) = tokio::join!(state.add_source(&spec), state.add_source(&spec));
        let mut names = vec![first.unwrap().name, second.unwrap().name];
        names.sort();

        assert_eq!(names, vec!["Playlist 1", "Playlist 2"]);
    }
}
