//! Customer Registry server - customer registration HTTP service.
//!
//! This binary serves the registration API on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework with a JSON API
//! - `customer-registry-core` for validation shared with clients
//! - `PostgreSQL` for customer records, unique on tax id and email
//! - In-memory store when `DATABASE_URL=memory:` (local demos)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use customer_registry_server::config::{RuntimeEnvironment, ServerConfig};
use customer_registry_server::db::{self, CustomerStore, MemoryCustomerStore, PgCustomerStore};
use customer_registry_server::state::AppState;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry.dsn.as_ref()?;

    let environment = config
        .sentry
        .environment
        .clone()
        .unwrap_or_else(|| config.environment.as_str().to_owned());

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some(std::borrow::Cow::Owned(environment)),
            sample_rate: config.sentry.sample_rate,
            traces_sample_rate: config.sentry.traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Pick the store named by `DATABASE_URL`.
fn build_store(config: &ServerConfig) -> Result<Arc<dyn CustomerStore>, sqlx::Error> {
    if config.database.is_in_memory() {
        tracing::warn!("Using in-memory customer store; records are lost on restart");
        return Ok(Arc::new(MemoryCustomerStore::new()));
    }

    let pool = db::create_pool(&config.database)?;
    tracing::info!("Database pool created");
    Ok(Arc::new(PgCustomerStore::new(pool)))
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "customer_registry_server=info,tower_http=debug".into());

    // JSON in production for structured log parsing, text locally
    let is_production = config.environment == RuntimeEnvironment::Production;
    let json_layer =
        is_production.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_production).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p customer-registry-cli -- migrate
    let store = build_store(&config).expect("Failed to create customer store");

    let addr = config.socket_addr();
    let state = AppState::new(config, store);
    let app = customer_registry_server::app(state);

    tracing::info!("customer registry listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
