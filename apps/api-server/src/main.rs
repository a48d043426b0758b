//! # Chirp API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::rate_limit::RateLimitMiddleware;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Chirp API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).await?;
    let rate_limit = build_rate_limit(&config)?;

    HttpServer::new(move || {
        App::new()
            .wrap(rate_limit.clone())
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(feature = "rate-limit")]
fn build_rate_limit(config: &AppConfig) -> anyhow::Result<RateLimitMiddleware> {
    use std::sync::Arc;
    use std::time::Duration;

    use chirp_infra::InMemoryRateLimiter;

    const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

    let limiter = Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())?);

    // Forget clients whose buckets have refilled.
    let pruned = limiter.clone();
    actix_web::rt::spawn(async move {
        let mut ticker = actix_web::rt::time::interval(PRUNE_INTERVAL);
        loop {
            ticker.tick().await;
            pruned.prune();
            tracing::debug!(clients = pruned.tracked_clients(), "Pruned rate limiter state");
        }
    });

    tracing::info!(
        burst = config.rate_limit.burst,
        replenish_secs = config.rate_limit.replenish_interval.as_secs(),
        "Rate limiting enabled"
    );

    Ok(RateLimitMiddleware::new(limiter))
}

#[cfg(not(feature = "rate-limit"))]
fn build_rate_limit(_config: &AppConfig) -> anyhow::Result<RateLimitMiddleware> {
    tracing::info!("Built without rate-limit feature - admission control disabled");
    Ok(RateLimitMiddleware::disabled())
}
