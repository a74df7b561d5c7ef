//! Customer Registry Core - Shared types and validation rules.
//!
//! This crate is used by every Customer Registry component:
//! - `server` - The HTTP service that validates and persists registrations
//! - `cli` - Command-line tools (migrations, registration client)
//!
//! # Architecture
//!
//! The core crate contains only types, validation and message catalogs - no
//! I/O, no database access, no HTTP clients. The same rules run on the client
//! for immediate feedback and on the server as the authoritative check.
//!
//! # Modules
//!
//! - [`types`] - Validated newtypes (name, tax id, email, color, notes) and customer records
//! - [`validation`] - Turns an untyped JSON payload into a [`NormalizedCustomer`]
//! - [`i18n`] - Localized user-facing messages
//! - [`api`] - JSON envelope shared by the server and its clients

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod i18n;
pub mod types;
pub mod validation;

pub use i18n::Locale;
pub use types::*;
pub use validation::{Field, FieldError, FieldErrorKind, ValidationErrors, validate};
