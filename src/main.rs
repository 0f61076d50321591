use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zapper::{config::Config, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zapper=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_addr();

    let state = server::AppState::new(config)?;
    let app = server::create_router(state.clone())?;

    // Playlists load in the background; the API serves whatever is merged so far.
    tokio::spawn(async move {
        state.load_startup_playlists().await;
    });

    tracing::info!("Starting zapper server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
