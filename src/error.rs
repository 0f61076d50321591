use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to fetch URL: {url} - {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Fetch timeout for URL: {0}")]
    FetchTimeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header encoding: {0}")]
    InvalidHeaderEncoding(String),

    #[error("Failed to read playlist file: {path} - {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("No playlist content found at: {0}")]
    NoPlaylistContent(String),

    #[error("No channels found in playlist: {0}")]
    EmptyPlaylist(String),

    #[error("Playlist not found: {0}")]
    PlaylistNotFound(String),

    #[error("Source not allowed: {0}")]
    SourceNotAllowed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

impl Error {
    fn error_code(&self) -> &'static str {
        match self {
            Self::FetchFailed { .. } => "FETCH_FAILED",
            Self::FetchTimeout(_) => "FETCH_TIMEOUT",
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::InvalidHeaderEncoding(_) => "INVALID_HEADER_ENCODING",
            Self::ReadFailed { .. } => "READ_FAILED",
            Self::NoPlaylistContent(_) => "NO_PLAYLIST_CONTENT",
            Self::EmptyPlaylist(_) => "EMPTY_PLAYLIST",
            Self::PlaylistNotFound(_) => "PLAYLIST_NOT_FOUND",
            Self::SourceNotAllowed(_) => "SOURCE_NOT_ALLOWED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::FetchFailed { .. } | Self::NoPlaylistContent(_) => StatusCode::BAD_GATEWAY,
            Self::FetchTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::InvalidUrl(_) | Self::InvalidHeaderEncoding(_) | Self::ReadFailed { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::EmptyPlaylist(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PlaylistNotFound(_) => StatusCode::NOT_FOUND,
            Self::SourceNotAllowed(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.error_code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::InvalidUrl(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::FetchTimeout(e.url().map(|u| u.to_string()).unwrap_or_default())
        } else {
            Self::FetchFailed {
                url: e.url().map(|u| u.to_string()).unwrap_or_default(),
                reason: e.to_string(),
            }
        }
    }
}
