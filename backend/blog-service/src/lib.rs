/// Blog Service Library
///
/// REST API for a small blogging platform: posts, read-only groups, comments
/// nested under posts and follow subscriptions between users.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route registration
/// - `models`: Rows, request payloads and wire representations
/// - `services`: Business rules (author checks, follow rules)
/// - `repository`: Storage seam with PostgreSQL and in-memory backends
/// - `db`: SQL queries used by the PostgreSQL backend
/// - `middleware`: Bearer authentication, permissions, request metrics
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
/// - `openapi`: API documentation
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod repository;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};

use actix_web::web;
use jwt_security::JwtManager;
use sqlx::migrate::Migrator;
use std::sync::Arc;

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Register `/metrics`, the health routes and the authenticated `/api/v1` scope.
///
/// The app must provide `web::Data<Arc<dyn BlogRepository>>`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, jwt: Arc<JwtManager>) {
    cfg.route("/metrics", web::get().to(metrics::serve_metrics))
        .configure(handlers::configure_health)
        .service(
            web::scope("/api/v1")
                .wrap(middleware::AuthMiddleware::new(jwt))
                .wrap(middleware::MetricsMiddleware)
                .configure(handlers::configure),
        );
}
