//! Customer registration: duplicate check, then insert.
//!
//! The pre-check only exists to produce a friendly message early. The store's
//! unique constraints are the source of truth: a violation on insert is
//! reported exactly like a pre-check hit, so two concurrent submissions of the
//! same tax id or email still end with one `Created` and one `Duplicate`.

use std::sync::Arc;
use std::time::Duration;

use customer_registry_core::{Field, NormalizedCustomer, StoredCustomer};
use futures::future::BoxFuture;
use thiserror::Error;
use tracing::instrument;

use crate::config::DatabaseConfig;
use crate::db::{CustomerStore, RepositoryError};

/// SQLSTATE codes that mean the database is down or overloaded.
const UNAVAILABLE_SQLSTATES: &[&str] = &["53300", "57014", "57P01", "57P02", "57P03"];

/// Why a registration did not produce a customer.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Another customer already uses this field.
    #[error("duplicate {}", .0.wire_name())]
    Duplicate(Field),

    /// The store timed out or could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other store failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for RegistrationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Duplicate(field) => Self::Duplicate(field),
            RepositoryError::Database(ref e) if is_unavailable(e) => {
                Self::Unavailable(err.to_string())
            }
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Whether a database error is an infrastructure outage rather than a bug.
///
/// Pool exhaustion, closed pools, socket and TLS failures (connection refused,
/// DNS resolution) and the server-side connection/shutdown/cancel SQLSTATEs
/// count as outages.
#[must_use]
pub fn is_unavailable(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| code.starts_with("08") || UNAVAILABLE_SQLSTATES.contains(&&*code)),
        _ => false,
    }
}

/// Registers validated customers against a [`CustomerStore`].
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn CustomerStore>,
    operation_timeout: Duration,
}

impl RegistrationService {
    /// Create a service whose store calls are each bounded by `operation_timeout`.
    #[must_use]
    pub fn new(store: Arc<dyn CustomerStore>, operation_timeout: Duration) -> Self {
        Self {
            store,
            operation_timeout,
        }
    }

    /// Create a service using the timeout from `config`.
    #[must_use]
    pub fn from_config(store: Arc<dyn CustomerStore>, config: &DatabaseConfig) -> Self {
        Self::new(store, config.operation_timeout)
    }

    /// Register a customer.
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::Duplicate`] if the tax id or email is taken
    ///   (tax id reported first)
    /// - [`RegistrationError::Unavailable`] if the store times out or is unreachable
    /// - [`RegistrationError::Internal`] for any other store failure
    #[instrument(skip_all)]
    pub async fn register(
        &self,
        customer: NormalizedCustomer,
    ) -> Result<StoredCustomer, RegistrationError> {
        let conflict = self
            .bounded(self.store.find_conflict(&customer.tax_id, &customer.email))
            .await?;

        if let Some(field) = conflict {
            tracing::warn!(field = field.wire_name(), "Registration rejected: duplicate");
            return Err(RegistrationError::Duplicate(field));
        }

        match self.bounded(self.store.insert(&customer)).await {
            Ok(stored) => {
                tracing::info!(customer_id = %stored.id, "Customer registered");
                Ok(stored)
            }
            Err(RegistrationError::Duplicate(field)) => {
                tracing::warn!(
                    field = field.wire_name(),
                    "Registration rejected: unique constraint"
                );
                Err(RegistrationError::Duplicate(field))
            }
            Err(e) => Err(e),
        }
    }

    async fn bounded<T>(
        &self,
        operation: BoxFuture<'_, Result<T, RepositoryError>>,
    ) -> Result<T, RegistrationError> {
        match tokio::time::timeout(self.operation_timeout, operation).await {
            Ok(result) => result.map_err(RegistrationError::from),
            Err(_) => Err(RegistrationError::Unavailable(format!(
                "store operation timed out after {}ms",
                self.operation_timeout.as_millis()
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use customer_registry_core::{Email, TaxId, validate};
    use futures::future;
    use serde_json::json;

    use super::*;
    use crate::db::MemoryCustomerStore;

    fn customer(tax_id: &str, email: &str) -> NormalizedCustomer {
        validate(&json!({
            "fullName": "John Doe",
            "cpf": tax_id,
            "email": email,
            "favoriteColor": "BLUE",
        }))
        .unwrap()
    }

    fn service(store: impl CustomerStore + 'static) -> RegistrationService {
        RegistrationService::new(Arc::new(store), Duration::from_millis(200))
    }

    /// Store whose every call fails with the error produced by `make`.
    struct FailingStore(fn() -> sqlx::Error);

    impl CustomerStore for FailingStore {
        fn find_conflict<'a>(
            &'a self,
            _: &'a TaxId,
            _: &'a Email,
        ) -> BoxFuture<'a, Result<Option<Field>, RepositoryError>> {
            Box::pin(future::ready(Err(RepositoryError::Database((self.0)()))))
        }

        fn insert<'a>(
            &'a self,
            _: &'a NormalizedCustomer,
        ) -> BoxFuture<'a, Result<StoredCustomer, RepositoryError>> {
            Box::pin(future::ready(Err(RepositoryError::Database((self.0)()))))
        }

        fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
            Box::pin(future::ready(Ok(())))
        }
    }

    /// Store that never answers in time.
    struct StalledStore;

    impl CustomerStore for StalledStore {
        fn find_conflict<'a>(
            &'a self,
            _: &'a TaxId,
            _: &'a Email,
        ) -> BoxFuture<'a, Result<Option<Field>, RepositoryError>> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(None)
            })
        }

        fn insert<'a>(
            &'a self,
            _: &'a NormalizedCustomer,
        ) -> BoxFuture<'a, Result<StoredCustomer, RepositoryError>> {
            Box::pin(future::pending())
        }

        fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
            Box::pin(future::pending())
        }
    }

    /// Store whose pre-check misses a record that the insert then collides with,
    /// as when a concurrent request wins the race.
    struct RacingStore(Field);

    impl CustomerStore for RacingStore {
        fn find_conflict<'a>(
            &'a self,
            _: &'a TaxId,
            _: &'a Email,
        ) -> BoxFuture<'a, Result<Option<Field>, RepositoryError>> {
            Box::pin(future::ready(Ok(None)))
        }

        fn insert<'a>(
            &'a self,
            _: &'a NormalizedCustomer,
        ) -> BoxFuture<'a, Result<StoredCustomer, RepositoryError>> {
            Box::pin(future::ready(Err(RepositoryError::Duplicate(self.0))))
        }

        fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
            Box::pin(future::ready(Ok(())))
        }
    }

    #[tokio::test]
    async fn test_register_into_empty_store() {
        let service = service(MemoryCustomerStore::new());
        let stored = service
            .register(customer("52998224725", "john@example.com"))
            .await
            .unwrap();

        assert_eq!(stored.tax_id.as_str(), "52998224725");
        assert_eq!(stored.email.as_str(), "john@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_detection_cites_field() {
        let service = service(MemoryCustomerStore::new());
        service
            .register(customer("52998224725", "first@example.com"))
            .await
            .unwrap();
        service
            .register(customer("11144477735", "x@y.com"))
            .await
            .unwrap();

        let err = service
            .register(customer("52998224725", "new@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Duplicate(Field::TaxId)));

        let err = service
            .register(customer("12345678909", "x@y.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Duplicate(Field::Email)));

        let err = service
            .register(customer("52998224725", "x@y.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Duplicate(Field::TaxId)));
    }

    #[tokio::test]
    async fn test_same_record_matching_both_fields_cites_tax_id() {
        let service = service(MemoryCustomerStore::new());
        service
            .register(customer("52998224725", "john@example.com"))
            .await
            .unwrap();

        let err = service
            .register(customer("529.982.247-25", "JOHN@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Duplicate(Field::TaxId)));
    }

    #[tokio::test]
    async fn test_constraint_violation_is_duplicate() {
        let err = service(RacingStore(Field::Email))
            .register(customer("52998224725", "john@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Duplicate(Field::Email)));
    }

    #[tokio::test]
    async fn test_stalled_store_is_unavailable() {
        let err = service(StalledStore)
            .register(customer("52998224725", "john@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::Unavailable(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn test_connection_failures_are_unavailable() {
        let errors: [fn() -> sqlx::Error; 3] = [
            || sqlx::Error::PoolTimedOut,
            || sqlx::Error::PoolClosed,
            || {
                sqlx::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connect ECONNREFUSED 127.0.0.1:5432",
                ))
            },
        ];

        for make in errors {
            let err = service(FailingStore(make))
                .register(customer("52998224725", "john@example.com"))
                .await
                .unwrap_err();
            assert!(matches!(err, RegistrationError::Unavailable(_)), "{err}");
        }
    }

    #[tokio::test]
    async fn test_other_failures_are_internal() {
        let errors: [fn() -> sqlx::Error; 2] = [
            || sqlx::Error::RowNotFound,
            || sqlx::Error::ColumnNotFound("cpf".to_owned()),
        ];

        for make in errors {
            let err = service(FailingStore(make))
                .register(customer("52998224725", "john@example.com"))
                .await
                .unwrap_err();
            assert!(matches!(err, RegistrationError::Internal(_)), "{err}");
        }
    }
}
