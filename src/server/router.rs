use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{
    handlers::{
        handle_add_playlist, handle_channels, handle_groups, handle_list_playlists,
        handle_remove_playlist, handle_stream,
    },
    state::AppState,
};

/// Create the application router.
pub fn create_router(state: AppState) -> anyhow::Result<Router> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    let cors_origin = state.config.cors_allowed_origin.as_str();
    let cors = if cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(cors_origin.parse::<HeaderValue>()?)
            .allow_methods(methods)
            .allow_headers(Any)
    };

    let app = Router::new()
        .route("/channels", get(handle_channels))
        .route("/groups", get(handle_groups))
        .route(
            "/playlists",
            get(handle_list_playlists).post(handle_add_playlist),
        )
        .route("/playlists/{id}", delete(handle_remove_playlist))
        .route("/stream", get(handle_stream))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
