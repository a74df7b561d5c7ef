//! Tax id (CPF) check command.

use customer_registry_core::{Field, FieldError, Locale, TaxId};
use thiserror::Error;

/// The tax id was rejected; carries the localized message.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct InvalidTaxId(pub String);

/// Print the normalized tax id, or fail with the localized reason.
pub fn run(value: &str, locale: Locale) -> Result<(), InvalidTaxId> {
    let tax_id = check(value, locale)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{} ({})", tax_id.as_str(), tax_id.formatted());
    }
    Ok(())
}

fn check(value: &str, locale: Locale) -> Result<TaxId, InvalidTaxId> {
    TaxId::parse(value)
        .map_err(|e| InvalidTaxId(FieldError::new(Field::TaxId, e.into()).message(locale)))
}
