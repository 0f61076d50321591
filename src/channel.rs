pub mod media_type;

pub use media_type::MediaType;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Attribute key carrying the stream referrer.
pub const HTTP_REFERRER: &str = "http-referrer";
/// Attribute key carrying the stream user agent.
pub const HTTP_USER_AGENT: &str = "http-user-agent";
/// Prefix of attribute keys holding custom `#EXTVLCOPT:http-*` headers.
pub const VLC_HEADER_PREFIX: &str = "EXTVLCOPT:http-";

/// Group label used when a channel has no `group-title`.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Electronic program guide metadata from `tvg-*` attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tvg {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// One playable playlist entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub name: String,
    pub url: String,
    pub media_type: MediaType,
    /// `-1` for live or unknown duration.
    pub duration: f64,
    #[serde(default)]
    pub tvg: Tvg,
    #[serde(default)]
    pub group: Group,
    /// Transport extras: referrer, user agent and `EXTVLCOPT:http-*` headers.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl Channel {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: name.into(),
            media_type: MediaType::from_url(&url),
            url,
            duration: -1.0,
            tvg: Tvg::default(),
            group: Group::default(),
            attributes: BTreeMap::new(),
        }
    }

    /// Group title, or `"Uncategorized"` when absent or empty.
    pub fn group_title(&self) -> &str {
        match self.group.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => UNCATEGORIZED,
        }
    }

    /// HTTP headers a player must send when requesting `url`.
    pub fn stream_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();

        for (key, value) in &self.attributes {
            if value.is_empty() {
                continue;
            }

            let header = if key == HTTP_REFERRER {
                "Referer"
            } else if key == HTTP_USER_AGENT {
                "User-Agent"
            } else if let Some(name) = key.strip_prefix(VLC_HEADER_PREFIX) {
                name
            } else {
                continue;
            };

            headers.insert(header.to_string(), value.clone());
        }

        headers
    }
}
