//! `PostgreSQL` customer store.
//!
//! Queries are checked at runtime (`sqlx::query_as`) so the crate builds
//! without a live database.

use chrono::{DateTime, Utc};
use customer_registry_core::{
    CustomerId, Email, FavoriteColor, Field, FullName, NormalizedCustomer, Notes, StoredCustomer,
    TaxId,
};
use futures::future::BoxFuture;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CustomerStore, RepositoryError};

/// Unique constraint on `customers.cpf`.
const TAX_ID_CONSTRAINT: &str = "customers_cpf_key";
/// Unique constraint on `customers.email`.
const EMAIL_CONSTRAINT: &str = "customers_email_key";

/// Row shape returned by `INSERT ... RETURNING`.
#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: Uuid,
    full_name: String,
    cpf: String,
    email: String,
    favorite_color: FavoriteColor,
    observations: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for StoredCustomer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str, e: &dyn std::fmt::Display| {
            RepositoryError::DataCorruption(format!("invalid {what} in database: {e}"))
        };

        Ok(Self {
            id: CustomerId::new(row.id),
            full_name: FullName::parse(&row.full_name).map_err(|e| corrupt("full name", &e))?,
            tax_id: TaxId::parse(&row.cpf).map_err(|e| corrupt("cpf", &e))?,
            email: Email::parse(&row.email).map_err(|e| corrupt("email", &e))?,
            favorite_color: row.favorite_color,
            notes: row
                .observations
                .as_deref()
                .map(Notes::parse)
                .transpose()
                .map_err(|e| corrupt("observations", &e))?
                .flatten(),
            created_at: row.created_at,
        })
    }
}

/// Customer store backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    /// Create a new store on top of a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_conflict_impl(
        &self,
        tax_id: &TaxId,
        email: &Email,
    ) -> Result<Option<Field>, RepositoryError> {
        let row: Option<(bool,)> = sqlx::query_as(
            r"
            SELECT cpf = $1 AS tax_id_matches
            FROM customers
            WHERE cpf = $1 OR email = $2
            ORDER BY (cpf = $1) DESC
            LIMIT 1
            ",
        )
        .bind(tax_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(tax_id_matches,)| {
            if tax_id_matches {
                Field::TaxId
            } else {
                Field::Email
            }
        }))
    }

    async fn insert_impl(
        &self,
        customer: &NormalizedCustomer,
    ) -> Result<StoredCustomer, RepositoryError> {
        let row: CustomerRow = sqlx::query_as(
            r"
            INSERT INTO customers (full_name, cpf, email, favorite_color, observations)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, full_name, cpf, email, favorite_color, observations, created_at
            ",
        )
        .bind(&customer.full_name)
        .bind(&customer.tax_id)
        .bind(&customer.email)
        .bind(customer.favorite_color)
        .bind(customer.notes.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                match db_err.constraint() {
                    Some(TAX_ID_CONSTRAINT) => return RepositoryError::Duplicate(Field::TaxId),
                    Some(EMAIL_CONSTRAINT) => return RepositoryError::Duplicate(Field::Email),
                    _ => {}
                }
            }
            RepositoryError::Database(e)
        })?;

        StoredCustomer::try_from(row)
    }
}

impl CustomerStore for PgCustomerStore {
    fn find_conflict<'a>(
        &'a self,
        tax_id: &'a TaxId,
        email: &'a Email,
    ) -> BoxFuture<'a, Result<Option<Field>, RepositoryError>> {
        Box::pin(self.find_conflict_impl(tax_id, email))
    }

    fn insert<'a>(
        &'a self,
        customer: &'a NormalizedCustomer,
    ) -> BoxFuture<'a, Result<StoredCustomer, RepositoryError>> {
        Box::pin(self.insert_impl(customer))
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        Box::pin(async move {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        })
    }
}
