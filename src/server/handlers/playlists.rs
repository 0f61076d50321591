use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    library::SourceSpec,
    playlist::PlaylistSummary,
    server::state::AppState,
    Result,
};

/// Handle GET /playlists requests.
pub async fn handle_list_playlists(State(state): State<AppState>) -> Json<Vec<PlaylistSummary>> {
    Json(state.library.read().await.summaries())
}

/// Handle POST /playlists requests.
pub async fn handle_add_playlist(
    State(state): State<AppState>,
    Json(spec): Json<SourceSpec>,
) -> Result<(StatusCode, Json<PlaylistSummary>)> {
    tracing::info!("Add playlist request: {}", spec.source);

    let summary = state.add_source(&spec).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// Handle DELETE /playlists/{id} requests.
pub async fn handle_remove_playlist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlaylistSummary>> {
    tracing::info!("Remove playlist request: {}", id);

    Ok(Json(state.remove_playlist(id).await?))
}
