//! Business logic services.
//!
//! - [`registration`] - Duplicate check and insert for validated customers
//! - [`demo`] - Random sample payloads for demo mode

pub mod demo;
pub mod registration;

pub use registration::{RegistrationError, RegistrationService};
