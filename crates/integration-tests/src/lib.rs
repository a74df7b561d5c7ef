//! Integration tests for Customer Registry.
//!
//! These tests talk to a running server over HTTP and are ignored by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p customer-registry-cli -- migrate
//!
//! # Start the server (DATABASE_URL=memory: also works)
//! cargo run -p customer-registry-server
//!
//! # Run integration tests
//! cargo test -p customer-registry-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `REGISTRY_BASE_URL` - Server under test (default: `http://localhost:3000`)

use customer_registry_core::TaxId;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("REGISTRY_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A valid tax id that is very unlikely to exist in the target database.
#[must_use]
pub fn unique_tax_id() -> TaxId {
    loop {
        let bytes = Uuid::new_v4().into_bytes();
        let mut base = [0u8; 9];
        for (digit, byte) in base.iter_mut().zip(bytes) {
            *digit = byte % 10;
        }
        if let Some(tax_id) = TaxId::from_base(base) {
            return tax_id;
        }
    }
}

/// An email address that is very unlikely to exist in the target database.
#[must_use]
pub fn unique_email() -> String {
    format!("it-{}@example.com", Uuid::new_v4().simple())
}

/// A create request body with the given identity fields.
#[must_use]
pub fn registration_body(tax_id: &str, email: &str) -> Value {
    json!({
        "fullName": "Integration Test",
        "cpf": tax_id,
        "email": email,
        "favoriteColor": "INDIGO",
        "observations": "  created by integration tests  ",
    })
}
