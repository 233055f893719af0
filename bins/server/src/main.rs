//! thbfx API server
//!
//! Main entry point for the THB conversion record service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use thbfx_api::{AppState, create_router};
use thbfx_db::connect_with;
use thbfx_shared::{AppConfig, BotClient, JwtConfig, JwtService};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "thbfx=debug,tower_http=debug".into());
    let json = std::env::var("THBFX_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let config = AppConfig::load()?;

    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    if !config.bot.is_configured() {
        warn!("BOT API key not set; foreign rates must be entered manually");
    }
    let bot_client = BotClient::new(config.bot.clone())?;

    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        rate_provider: Arc::new(bot_client),
    };

    let app = create_router(state, &config.server.cors_origins);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
