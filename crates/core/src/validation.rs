//! Validation of untrusted registration payloads.
//!
//! [`validate`] is the single entry point. Every field is checked
//! independently so a form can show all problems at once; API responses use
//! [`ValidationErrors::first`] for a single message.
//!
//! # Wire field names
//!
//! | Field | JSON key |
//! |---|---|
//! | full name | `fullName` |
//! | tax id | `cpf` |
//! | email | `email` |
//! | favorite color | `favoriteColor` |
//! | notes | `observations` |

use core::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::i18n::{self, Locale};
use crate::types::{
    Email, EmailError, FavoriteColor, FullName, NormalizedCustomer, Notes, TaxId, TaxIdError,
    TextError,
};

/// A registration field, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    #[serde(rename = "fullName")]
    FullName,
    #[serde(rename = "cpf")]
    TaxId,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "favoriteColor")]
    FavoriteColor,
    #[serde(rename = "observations")]
    Notes,
}

impl Field {
    /// JSON key of this field in requests.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::TaxId => "cpf",
            Self::Email => "email",
            Self::FavoriteColor => "favoriteColor",
            Self::Notes => "observations",
        }
    }
}

/// What was wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Missing or `null`.
    Required,
    /// Present but not a JSON string.
    NotText,
    /// Shorter than `min` characters after trimming.
    TooShort { min: usize },
    /// Longer than `max` characters after normalization.
    TooLong { max: usize },
    /// Not exactly 11 digits after removing the mask.
    TaxIdWrongLength,
    /// Check digits do not match, or a single repeated digit.
    TaxIdInvalid,
    /// Not a syntactically valid email address.
    EmailInvalid,
    /// Not one of the seven color tokens.
    ColorInvalid,
}

impl From<TaxIdError> for FieldErrorKind {
    fn from(err: TaxIdError) -> Self {
        match err {
            TaxIdError::WrongLength { .. } => Self::TaxIdWrongLength,
            TaxIdError::Invalid => Self::TaxIdInvalid,
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub kind: FieldErrorKind,
}

impl FieldError {
    #[must_use]
    pub const fn new(field: Field, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }

    /// User-facing message in the given locale.
    #[must_use]
    pub fn message(&self, locale: Locale) -> String {
        i18n::field_error_message(self, locale)
    }
}

/// All field errors of one payload, in field order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// The first error, for single-message responses.
    #[must_use]
    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    /// The error reported for `field`, if any.
    #[must_use]
    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Every message, rendered in `locale`.
    #[must_use]
    pub fn messages(&self, locale: Locale) -> Vec<String> {
        self.0.iter().map(|e| e.message(locale)).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages(Locale::En).join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate and normalize an untrusted registration payload.
///
/// Non-object input fails every required field.
///
/// # Errors
///
/// Returns every field error found, in field order.
pub fn validate(input: &Value) -> Result<NormalizedCustomer, ValidationErrors> {
    let empty = Map::new();
    let fields = input.as_object().unwrap_or(&empty);
    let get = |field: Field| fields.get(field.wire_name()).filter(|v| !v.is_null());

    let full_name = full_name(get(Field::FullName));
    let tax_id = tax_id(get(Field::TaxId));
    let email = email(get(Field::Email));
    let favorite_color = favorite_color(get(Field::FavoriteColor));
    let notes = notes(get(Field::Notes));

    match (full_name, tax_id, email, favorite_color, notes) {
        (Ok(full_name), Ok(tax_id), Ok(email), Ok(favorite_color), Ok(notes)) => {
            Ok(NormalizedCustomer {
                full_name,
                tax_id,
                email,
                favorite_color,
                notes,
            })
        }
        (full_name, tax_id, email, favorite_color, notes) => Err(ValidationErrors(
            [
                full_name.err(),
                tax_id.err(),
                email.err(),
                favorite_color.err(),
                notes.err(),
            ]
            .into_iter()
            .flatten()
            .collect(),
        )),
    }
}

/// Require a JSON string, reporting `missing` when absent.
fn text(
    value: Option<&Value>,
    field: Field,
    missing: FieldErrorKind,
) -> Result<&str, FieldError> {
    match value {
        None => Err(FieldError::new(field, missing)),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(_) => Err(FieldError::new(field, FieldErrorKind::NotText)),
    }
}

const fn text_error(field: Field, err: TextError) -> FieldError {
    match err {
        TextError::TooShort { min } => FieldError::new(field, FieldErrorKind::TooShort { min }),
        TextError::TooLong { max } => FieldError::new(field, FieldErrorKind::TooLong { max }),
    }
}

fn full_name(value: Option<&Value>) -> Result<FullName, FieldError> {
    let raw = text(value, Field::FullName, FieldErrorKind::Required)?;
    FullName::parse(raw).map_err(|e| text_error(Field::FullName, e))
}

fn tax_id(value: Option<&Value>) -> Result<TaxId, FieldError> {
    let raw = text(value, Field::TaxId, FieldErrorKind::Required)?;
    TaxId::parse(raw).map_err(|e| FieldError::new(Field::TaxId, e.into()))
}

fn email(value: Option<&Value>) -> Result<Email, FieldError> {
    let invalid = FieldError::new(Field::Email, FieldErrorKind::EmailInvalid);
    let Some(Value::String(raw)) = value else {
        return Err(invalid);
    };
    Email::parse(raw).map_err(|e| match e {
        EmailError::Invalid => invalid,
        EmailError::TooLong { max } => FieldError::new(Field::Email, FieldErrorKind::TooLong { max }),
    })
}

fn favorite_color(value: Option<&Value>) -> Result<FavoriteColor, FieldError> {
    value
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .ok_or(FieldError::new(Field::FavoriteColor, FieldErrorKind::ColorInvalid))
}

fn notes(value: Option<&Value>) -> Result<Option<Notes>, FieldError> {
    match value {
        None => Ok(None),
        Some(Value::String(raw)) => Notes::parse(raw).map_err(|e| text_error(Field::Notes, e)),
        Some(_) => Err(FieldError::new(Field::Notes, FieldErrorKind::NotText)),
    }
}
