use std::net::SocketAddr;
use std::time::Duration;

use tracing::{error, info};

use mapgate_api::{build_router, AppState};
use mapgate_session::{session_layer, MemorySessionStore};
use mapgate_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    mapgate_shared::telemetry::init_telemetry();

    info!("MapGate server starting...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        env = %config.app.env,
        static_dir = %config.app.static_dir,
        "Configuration loaded"
    );

    // Session store plus its expiry sweeper
    let store = MemorySessionStore::new();
    tokio::spawn(
        store
            .clone()
            .run_sweeper(Duration::from_secs(config.session.sweep_interval_secs)),
    );
    let sessions = session_layer(store, &config.session, config.is_production());

    // Create App State
    let state = AppState::new(config.clone())?;

    // Build router
    let app = build_router(state, sessions);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
