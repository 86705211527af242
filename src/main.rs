//! TechMeet portal service
//!
//! Main application entry point

use tracing::{info, error};

use TechMeet::{
    config::Settings,
    database::{self, DatabaseService},
    utils::logging,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", TechMeet::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = database::create_pool(&settings.database).await?;

    // Run database migrations
    database::run_migrations(&pool).await?;

    // Initialize services
    info!("Initializing services...");
    let addr = settings.bind_addr()?;
    let state = AppState::from_settings(settings, DatabaseService::new(pool))?;
    let app = TechMeet::app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "TechMeet is listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("TechMeet stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
