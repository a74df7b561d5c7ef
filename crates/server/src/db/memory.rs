//! In-process customer store.
//!
//! Enforces the same uniqueness rules as the `customers` table. Selected with
//! `DATABASE_URL=memory:`; data is lost on restart.

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use customer_registry_core::{
    CustomerId, Email, Field, NormalizedCustomer, StoredCustomer, TaxId,
};
use futures::future::{self, BoxFuture};

use super::{CustomerStore, RepositoryError};

/// Customer store held in memory.
#[derive(Debug, Default)]
pub struct MemoryCustomerStore {
    customers: Mutex<Vec<StoredCustomer>>,
}

impl MemoryCustomerStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored customers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<StoredCustomer>> {
        // A panic mid-push cannot leave the Vec half-updated.
        self.customers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn conflict(customers: &[StoredCustomer], tax_id: &TaxId, email: &Email) -> Option<Field> {
        if customers.iter().any(|c| &c.tax_id == tax_id) {
            Some(Field::TaxId)
        } else if customers.iter().any(|c| &c.email == email) {
            Some(Field::Email)
        } else {
            None
        }
    }
}

impl CustomerStore for MemoryCustomerStore {
    fn find_conflict<'a>(
        &'a self,
        tax_id: &'a TaxId,
        email: &'a Email,
    ) -> BoxFuture<'a, Result<Option<Field>, RepositoryError>> {
        let conflict = Self::conflict(&self.lock(), tax_id, email);
        Box::pin(future::ready(Ok(conflict)))
    }

    fn insert<'a>(
        &'a self,
        customer: &'a NormalizedCustomer,
    ) -> BoxFuture<'a, Result<StoredCustomer, RepositoryError>> {
        let mut customers = self.lock();

        let result = match Self::conflict(&customers, &customer.tax_id, &customer.email) {
            Some(field) => Err(RepositoryError::Duplicate(field)),
            None => {
                let stored = StoredCustomer {
                    id: CustomerId::generate(),
                    full_name: customer.full_name.clone(),
                    tax_id: customer.tax_id.clone(),
                    email: customer.email.clone(),
                    favorite_color: customer.favorite_color,
                    notes: customer.notes.clone(),
                    created_at: Utc::now(),
                };
                customers.push(stored.clone());
                Ok(stored)
            }
        };

        Box::pin(future::ready(result))
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), RepositoryError>> {
        Box::pin(future::ready(Ok(())))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use customer_registry_core::validate;
    use serde_json::json;

    use super::*;

    fn customer(tax_id: &str, email: &str) -> NormalizedCustomer {
        validate(&json!({
            "fullName": "Test Customer",
            "cpf": tax_id,
            "email": email,
            "favoriteColor": "GREEN",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_identity() {
        let store = MemoryCustomerStore::new();
        let first = store.insert(&customer("52998224725", "a@example.com")).await.unwrap();
        let second = store.insert(&customer("11144477735", "b@example.com")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(second.created_at >= first.created_at);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_insert_enforces_uniqueness() {
        let store = MemoryCustomerStore::new();
        store.insert(&customer("52998224725", "a@example.com")).await.unwrap();

        let err = store
            .insert(&customer("52998224725", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(Field::TaxId)));

        let err = store
            .insert(&customer("11144477735", "a@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Duplicate(Field::Email)));

        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_find_conflict_prefers_tax_id_across_records() {
        let store = MemoryCustomerStore::new();
        store.insert(&customer("52998224725", "first@example.com")).await.unwrap();
        store.insert(&customer("11144477735", "x@y.com")).await.unwrap();

        let tax_id = TaxId::parse("52998224725").unwrap();
        let email = Email::parse("x@y.com").unwrap();
        assert_eq!(
            store.find_conflict(&tax_id, &email).await.unwrap(),
            Some(Field::TaxId)
        );

        let fresh = TaxId::parse("12345678909").unwrap();
        assert_eq!(
            store.find_conflict(&fresh, &email).await.unwrap(),
            Some(Field::Email)
        );

        let unused = Email::parse("new@example.com").unwrap();
        assert_eq!(store.find_conflict(&fresh, &unused).await.unwrap(), None);
    }
}
