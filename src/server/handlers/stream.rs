use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use url::Url;

use crate::{
    channel::MediaType,
    proxy::HeaderCodec,
    server::{params::StreamParams, state::AppState},
    Error, Result,
};

/// Handle GET /stream requests.
pub async fn handle_stream(
    State(state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Result<Response> {
    tracing::info!("Stream request: {}", params.url);

    let url = Url::parse(&params.url)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl(format!(
            "unsupported scheme: {}",
            url.scheme()
        )));
    }

    let overrides = HeaderCodec::decode_optional(params.h.as_deref())?;
    let headers = outbound_headers(&state, url.as_str(), overrides).await;

    let response = state.client.relay(url.as_str(), Some(&headers)).await?;

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| MediaType::from_url(url.path()).content_type().to_string());

    tracing::debug!("Relaying {} as {}", url, content_type);

    Ok((
        [(header::CONTENT_TYPE, content_type)],
        Body::from_stream(response.bytes_stream()),
    )
        .into_response())
}

/// Registered headers for `url`, with `overrides` applied on top.
async fn outbound_headers(
    state: &AppState,
    url: &str,
    overrides: HashMap<String, String>,
) -> HashMap<String, String> {
    let mut headers = state
        .headers
        .read()
        .await
        .resolve(url)
        .cloned()
        .unwrap_or_default();

    for (key, value) in overrides {
        headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
        headers.insert(key, value);
    }

    headers
}
