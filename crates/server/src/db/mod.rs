//! Customer persistence.
//!
//! # Database: `registry`
//!
//! ## Tables
//!
//! - `customers` - Registered customers, unique on `cpf` and on `email`
//!
//! # Stores
//!
//! Handlers and services talk to a [`CustomerStore`]:
//! - [`PgCustomerStore`] - `PostgreSQL`, the production store
//! - [`MemoryCustomerStore`] - In-process store with the same uniqueness rules
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p customer-registry-cli -- migrate
//! ```

pub mod customers;
pub mod memory;

use std::str::FromStr;

use customer_registry_core::{Email, Field, NormalizedCustomer, StoredCustomer, TaxId};
use futures::future::BoxFuture;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use thiserror::Error;

use crate::config::DatabaseConfig;

pub use customers::PgCustomerStore;
pub use memory::MemoryCustomerStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Unique constraint violation on the given field.
    #[error("constraint violation: duplicate {}", .0.wire_name())]
    Duplicate(Field),
}

/// Storage backend for customer registrations.
///
/// Implementations must enforce uniqueness of `cpf` and `email` on
/// [`insert`](Self::insert) itself; [`find_conflict`](Self::find_conflict) is
/// only a pre-check.
pub trait CustomerStore: Send + Sync {
    /// Find the field an existing customer already uses.
    ///
    /// When both fields are taken, by one customer or by two, reports
    /// [`Field::TaxId`].
    fn find_conflict<'a>(
        &'a self,
        tax_id: &'a TaxId,
        email: &'a Email,
    ) -> BoxFuture<'a, Result<Option<Field>, RepositoryError>>;

    /// Persist a customer, assigning its id and creation time.
    ///
    /// Returns [`RepositoryError::Duplicate`] on a uniqueness violation.
    fn insert<'a>(
        &'a self,
        customer: &'a NormalizedCustomer,
    ) -> BoxFuture<'a, Result<StoredCustomer, RepositoryError>>;

    /// Trivial liveness query.
    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>>;
}

/// Create a lazily-connecting `PostgreSQL` pool tuned to fail fast.
///
/// No connection is opened until the first query, so the server starts (and
/// reports itself unhealthy) while the database is down.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection string cannot be parsed.
pub fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let statement_timeout = config.statement_timeout.as_millis().to_string();
    let options = PgConnectOptions::from_str(config.url.expose_secret())?
        .options([("statement_timeout", statement_timeout.as_str())]);

    Ok(PgPoolOptions::new()
        .max_connections(10)
        .min_connections(0)
        .acquire_timeout(config.connect_timeout)
        .connect_lazy_with(options))
}
