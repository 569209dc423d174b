//! Server binary: load `.env`, connect to the database (exit on failure), serve until shutdown.

use machine_status_api::{build_app, connect, serve, shutdown_signal, AppState, PgStore, ServerConfig};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("machine_status_api=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        e
    })?;
    let pool = connect(&config.db).await.map_err(|e| {
        tracing::error!(error = %e, "could not connect to the database");
        e
    })?;

    let state = AppState::new(PgStore::new(pool.clone(), config.db.query_timeout));
    let app = build_app(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    serve(listener, app, shutdown_signal()).await?;

    pool.close().await;
    tracing::info!("database pool closed");
    Ok(())
}
