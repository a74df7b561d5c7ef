//! HTTP route handlers for the registration service.
//!
//! # Route Structure
//!
//! ```text
//! POST /api/customers          - Register a customer (rate limited)
//! GET  /api/customers/sample   - Random valid payload (demo mode only)
//! GET  /api/health             - Health check with database probe
//! ```

pub mod customers;
pub mod health;

use axum::{
    Router,
    routing::{get, post},
};

use crate::config::ServerConfig;
use crate::middleware::registration_rate_limiter;
use crate::state::AppState;

/// Create all API routes.
///
/// The sample route is only mounted when `demo_enabled` is set, so it answers
/// 404 otherwise.
pub fn routes(config: &ServerConfig) -> Router<AppState> {
    let router = Router::new()
        .route(
            "/api/customers",
            post(customers::create).layer(registration_rate_limiter(config.trusted_proxy)),
        )
        .route("/api/health", get(health::health));

    if config.demo_enabled {
        router.route("/api/customers/sample", get(customers::sample))
    } else {
        router
    }
}
