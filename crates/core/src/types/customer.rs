//! Customer records at each stage: validated, stored, and echoed to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CustomerId, Email, FavoriteColor, FullName, Notes, TaxId};

/// A registration that passed validation and is ready to persist.
///
/// Only [`crate::validate`] builds one from untrusted input. Serializes with
/// the same field names the create endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedCustomer {
    pub full_name: FullName,
    #[serde(rename = "cpf")]
    pub tax_id: TaxId,
    pub email: Email,
    pub favorite_color: FavoriteColor,
    #[serde(rename = "observations")]
    pub notes: Option<Notes>,
}

/// A persisted customer.
///
/// `id` and `created_at` are assigned by the store and never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCustomer {
    pub id: CustomerId,
    pub full_name: FullName,
    pub tax_id: TaxId,
    pub email: Email,
    pub favorite_color: FavoriteColor,
    pub notes: Option<Notes>,
    pub created_at: DateTime<Utc>,
}

/// The public view of a stored customer returned by the create endpoint.
///
/// Tax id and notes are never echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerData {
    pub id: CustomerId,
    pub full_name: String,
    pub email: String,
    pub favorite_color: FavoriteColor,
    pub created_at: DateTime<Utc>,
}

impl From<StoredCustomer> for CustomerData {
    fn from(customer: StoredCustomer) -> Self {
        Self {
            id: customer.id,
            full_name: customer.full_name.into_inner(),
            email: customer.email.into_inner(),
            favorite_color: customer.favorite_color,
            created_at: customer.created_at,
        }
    }
}
