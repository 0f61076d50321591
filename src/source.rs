//! Where playlist text comes from.

pub mod defaults;
pub mod naming;

pub use defaults::{DefaultPlaylist, DEFAULT_PLAYLISTS};

use once_cell::sync::Lazy;
use regex::Regex;
use std::{collections::HashMap, fmt, path::PathBuf};
use url::Url;

use crate::{proxy::ProxyClient, Error, Result};

static TVPASS_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)href="(https://tvpass\.org/[^"]*\.m3u)""#).expect("Regular expression error")
});

const TVPASS_PAGE: &str = "tvpass.org/playlist";
const M3U_HEADER: &str = "#EXTM3U";

/// A playlist location: remote URL or local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistSource {
    Url(Url),
    File(PathBuf),
}

impl PlaylistSource {
    /// `http://` and `https://` strings are URLs; anything else is a path.
    pub fn parse(source: &str) -> Result<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(Error::InvalidUrl("empty playlist source".to_string()));
        }

        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Self::Url(Url::parse(source)?))
        } else {
            Ok(Self::File(PathBuf::from(source)))
        }
    }

    /// The source as recorded on its playlist.
    pub fn location(&self) -> String {
        match self {
            Self::Url(url) => url.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    /// Name used when the caller gives none. May be empty.
    pub fn default_name(&self) -> String {
        match self {
            Self::Url(url) => naming::name_from_url(url.as_str()),
            Self::File(path) => naming::name_from_path(path),
        }
    }

    /// Fetch or read the playlist text.
    pub async fn acquire(&self, client: &ProxyClient) -> Result<String> {
        match self {
            Self::Url(url) if is_tvpass_page(url) => fetch_tvpass(client, url).await,
            Self::Url(url) => {
                tracing::info!("Fetching playlist: {}", url);
                client.fetch_text(url.as_str(), None).await
            }
            Self::File(path) => {
                tracing::info!("Reading playlist file: {}", path.display());
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| Error::ReadFailed {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    })
            }
        }
    }
}

impl fmt::Display for PlaylistSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.location())
    }
}

fn is_tvpass_page(url: &Url) -> bool {
    url.as_str().contains(TVPASS_PAGE)
}

/// TVPass serves an HTML page linking to the actual playlist.
async fn fetch_tvpass(client: &ProxyClient, url: &Url) -> Result<String> {
    let mut headers = HashMap::new();
    headers.insert(
        "Accept".to_string(),
        "text/html,application/xhtml+xml,*/*".to_string(),
    );

    let html = client.fetch_text(url.as_str(), Some(&headers)).await?;
    resolve_tvpass(client, url, html).await
}

async fn resolve_tvpass(client: &ProxyClient, url: &Url, html: String) -> Result<String> {
    if let Some(link) = find_tvpass_link(&html) {
        tracing::info!("Found direct M3U link for TVPass: {}", link);
        match client.fetch_text(link, None).await {
            Ok(text) => return Ok(text),
            Err(e) => tracing::warn!("TVPass playlist link failed: {}", e),
        }
    }

    if html.contains(M3U_HEADER) {
        return Ok(html);
    }

    Err(Error::NoPlaylistContent(url.to_string()))
}

fn find_tvpass_link(html: &str) -> Option<&str> {
    TVPASS_LINK
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
