//! Main entry point for the Trivia API

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trivia_api::{
    api,
    config::{LoggingConfig, Settings},
    store, AppState,
};

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "pretty" {
        registry.with(fmt::layer().pretty()).init();
    } else {
        registry.with(fmt::layer().json()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    init_tracing(&settings.logging);
    info!("Starting Trivia API");
    info!(
        "Loaded configuration: server={}:{} store={}",
        settings.server.host, settings.server.port, settings.database.backend
    );

    // Connect the store selected by configuration
    let store = store::connect(&settings.database).await?;
    info!(store = store.backend_name(), "Store ready");

    let addr = settings.bind_address();
    let app_state = Arc::new(AppState::new(settings, store));

    // Build the router
    let app = api::routes::create_router(app_state).await;

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
