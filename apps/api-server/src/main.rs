//! # Quill API Server
//!
//! The main entry point for the Actix-web HTTP server.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use api_server::config::AppConfig;
use api_server::configure_app;
use api_server::middleware::rate_limit::RateLimitMiddleware;
use api_server::state::AppState;
use api_server::telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        host = %config.host,
        port = config.port,
        "Starting Quill API Server"
    );

    let state = web::Data::new(AppState::new(&config).await);
    let rate_limit = rate_limit_middleware(&config);

    HttpServer::new(move || {
        App::new()
            .wrap(rate_limit.clone())
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(configure_app)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

#[cfg(feature = "rate-limit")]
fn rate_limit_middleware(config: &AppConfig) -> RateLimitMiddleware {
    use std::sync::Arc;

    use quill_infra::InMemoryRateLimiter;

    if !config.rate_limit_enabled {
        tracing::info!("Rate limiting disabled");
        return RateLimitMiddleware::disabled();
    }

    let limiter = Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()));

    // Evict idle client keys once a window.
    let sweeper = limiter.clone();
    let window = config.rate_limit.window.max(std::time::Duration::from_secs(1));
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(window);
        loop {
            interval.tick().await;
            sweeper.retain_recent();
        }
    });

    RateLimitMiddleware::new(limiter)
}

#[cfg(not(feature = "rate-limit"))]
fn rate_limit_middleware(config: &AppConfig) -> RateLimitMiddleware {
    if config.rate_limit_enabled {
        tracing::warn!("RATE_LIMIT_ENABLED ignored: built without the rate-limit feature");
    }
    RateLimitMiddleware::disabled()
}
