//! # Quill API Server
//!
//! Actix-web HTTP layer over the `quill-core` services.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;

use actix_web::web;

/// Register extractor configs and all routes.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(middleware::validation::json_config())
        .app_data(middleware::validation::query_config())
        .app_data(middleware::validation::path_config())
        .configure(handlers::configure_routes);
}
