//! CLI command implementations.

pub mod check_tax_id;
pub mod migrate;
pub mod register;
