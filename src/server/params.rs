use serde::Deserialize;

/// Query parameters for the /channels endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ChannelParams {
    /// Case-insensitive search over channel name and group.
    #[serde(default)]
    pub q: Option<String>,

    /// Only channels in this group (`Uncategorized` for none).
    #[serde(default)]
    pub group: Option<String>,
}

/// Query parameters for the /stream endpoint.
#[derive(Debug, Deserialize)]
pub struct StreamParams {
    /// Upstream stream URL.
    pub url: String,

    /// Base64url-encoded JSON headers, applied over registered ones.
    #[serde(default)]
    pub h: Option<String>,
}
