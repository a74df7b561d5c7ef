//! Localized user-facing messages.
//!
//! Every string shown to a registrant comes from here. Machine-readable error
//! codes (see [`crate::api::ErrorCode`]) never depend on the locale.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::validation::{Field, FieldError, FieldErrorKind};

/// Error returned when a locale tag is not supported.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported locale: {0} (expected pt-BR or en)")]
pub struct LocaleError(pub String);

/// Supported message locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    /// Brazilian Portuguese, the product locale.
    #[default]
    #[serde(rename = "pt-BR")]
    PtBr,
    /// English.
    #[serde(rename = "en")]
    En,
}

impl Locale {
    /// BCP 47 tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::PtBr => "pt-BR",
            Self::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "pt-br" | "pt" => Ok(Self::PtBr),
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            _ => Err(LocaleError(s.to_owned())),
        }
    }
}

/// Messages that are not tied to a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Request body could not be read as JSON.
    InvalidRequestData,
    /// A customer with the same value in `Field` already exists.
    Duplicate(Field),
    /// Backend unreachable or too slow.
    ServiceUnavailable,
    /// Anything unexpected on the server.
    InternalError,
    /// Client fallback for a 400 without a message.
    InvalidData,
    /// Client fallback for a 409 without a message.
    AlreadyRegistered,
    /// Client message for a 429.
    TooManyRequests,
    /// Client message for a 500.
    ServerError,
    /// Client message for a 503.
    ServiceTemporarilyUnavailable,
    /// Client message when the request never reached the server.
    NetworkError,
    /// Client message for any other status.
    Unexpected,
    /// Client heading for a created customer.
    Registered,
    /// Client label for the customer id.
    IdLabel,
    /// Client label for the favorite color.
    ColorLabel,
    /// Client label for the creation timestamp.
    CreatedAtLabel,
}

impl Message {
    /// Render in `locale`.
    #[must_use]
    pub fn text(self, locale: Locale) -> String {
        match locale {
            Locale::PtBr => pt_br(self),
            Locale::En => en(self),
        }
    }
}

fn pt_br(message: Message) -> String {
    match message {
        Message::InvalidRequestData => "Dados de solicitação inválidos".to_owned(),
        Message::Duplicate(field) => {
            format!("Um cliente com {} já existe", duplicate_label(field, Locale::PtBr))
        }
        Message::ServiceUnavailable => {
            "O serviço está temporariamente indisponível. Tente novamente em instantes.".to_owned()
        }
        Message::InternalError => {
            "Ocorreu um erro inesperado. Tente novamente mais tarde.".to_owned()
        }
        Message::InvalidData => {
            "Dados inválidos. Verifique os campos e tente novamente.".to_owned()
        }
        Message::AlreadyRegistered => "CPF ou email já cadastrado.".to_owned(),
        Message::TooManyRequests => {
            "Muitas tentativas. Aguarde um momento e tente novamente.".to_owned()
        }
        Message::ServerError => "Erro no servidor. Tente novamente mais tarde.".to_owned(),
        Message::ServiceTemporarilyUnavailable => {
            "Serviço temporariamente indisponível. Tente novamente mais tarde.".to_owned()
        }
        Message::NetworkError => "Erro de rede. Verifique sua conexão.".to_owned(),
        Message::Unexpected => "Ocorreu um erro inesperado. Tente novamente.".to_owned(),
        Message::Registered => "Cadastrado".to_owned(),
        Message::IdLabel => "id".to_owned(),
        Message::ColorLabel => "cor".to_owned(),
        Message::CreatedAtLabel => "criado em".to_owned(),
    }
}

fn en(message: Message) -> String {
    match message {
        Message::InvalidRequestData => "Invalid request data".to_owned(),
        Message::Duplicate(field) => {
            format!(
                "A customer with this {} already exists",
                duplicate_label(field, Locale::En)
            )
        }
        Message::ServiceUnavailable => {
            "The service is temporarily unavailable. Please try again shortly.".to_owned()
        }
        Message::InternalError => {
            "An unexpected error occurred. Please try again later.".to_owned()
        }
        Message::InvalidData => "Invalid data. Check the fields and try again.".to_owned(),
        Message::AlreadyRegistered => "CPF or email already registered.".to_owned(),
        Message::TooManyRequests => "Too many attempts. Wait a moment and try again.".to_owned(),
        Message::ServerError => "Server error. Please try again later.".to_owned(),
        Message::ServiceTemporarilyUnavailable => {
            "Service temporarily unavailable. Please try again later.".to_owned()
        }
        Message::NetworkError => "Network error. Check your connection.".to_owned(),
        Message::Unexpected => "An unexpected error occurred. Please try again.".to_owned(),
        Message::Registered => "Registered".to_owned(),
        Message::IdLabel => "id".to_owned(),
        Message::ColorLabel => "color".to_owned(),
        Message::CreatedAtLabel => "created at".to_owned(),
    }
}

/// Field name as it reads in a duplicate message. Portuguese carries the
/// demonstrative since it agrees with the noun.
const fn duplicate_label(field: Field, locale: Locale) -> &'static str {
    match (locale, field) {
        (Locale::PtBr, Field::FullName) => "este nome completo",
        (Locale::PtBr, Field::TaxId) => "este CPF",
        (Locale::PtBr, Field::Email) => "este email",
        (Locale::PtBr, Field::FavoriteColor) => "esta cor favorita",
        (Locale::PtBr, Field::Notes) => "estas observações",
        (Locale::En, Field::FullName) => "full name",
        (Locale::En, Field::TaxId) => "CPF",
        (Locale::En, Field::Email) => "email",
        (Locale::En, Field::FavoriteColor) => "favorite color",
        (Locale::En, Field::Notes) => "observations",
    }
}

/// Field label with article, and whether it takes a plural verb.
const fn field_label(field: Field, locale: Locale) -> (&'static str, bool) {
    match (locale, field) {
        (Locale::PtBr, Field::FullName) => ("O nome completo", false),
        (Locale::PtBr, Field::TaxId) => ("O CPF", false),
        (Locale::PtBr, Field::Email) => ("O email", false),
        (Locale::PtBr, Field::FavoriteColor) => ("A cor favorita", false),
        (Locale::PtBr, Field::Notes) => ("As observações", true),
        (Locale::En, Field::FullName) => ("Full name", false),
        (Locale::En, Field::TaxId) => ("CPF", false),
        (Locale::En, Field::Email) => ("Email", false),
        (Locale::En, Field::FavoriteColor) => ("Favorite color", false),
        (Locale::En, Field::Notes) => ("Observations", true),
    }
}

pub(crate) fn field_error_message(error: &FieldError, locale: Locale) -> String {
    let (label, plural) = field_label(error.field, locale);
    match locale {
        Locale::PtBr => {
            let must = if plural { "devem" } else { "deve" };
            match error.kind {
                FieldErrorKind::Required => format!("{label} é obrigatório"),
                FieldErrorKind::NotText => format!("{label} {must} ser um texto"),
                FieldErrorKind::TooShort { min } => {
                    format!("{label} {must} ter no mínimo {min} caracteres")
                }
                FieldErrorKind::TooLong { max } => {
                    format!("{label} {must} ter no máximo {max} caracteres")
                }
                FieldErrorKind::TaxIdWrongLength => "O CPF deve ter exatamente 11 dígitos".to_owned(),
                FieldErrorKind::TaxIdInvalid => "O CPF é inválido".to_owned(),
                FieldErrorKind::EmailInvalid => "Informe um email válido".to_owned(),
                FieldErrorKind::ColorInvalid => "Selecione uma cor válida".to_owned(),
            }
        }
        Locale::En => {
            match error.kind {
                FieldErrorKind::Required => format!("{label} is required"),
                FieldErrorKind::NotText => format!("{label} must be text"),
                FieldErrorKind::TooShort { min } => {
                    format!("{label} must be at least {min} characters")
                }
                FieldErrorKind::TooLong { max } => {
                    format!("{label} must be at most {max} characters")
                }
                FieldErrorKind::TaxIdWrongLength => "CPF must have exactly 11 digits".to_owned(),
                FieldErrorKind::TaxIdInvalid => "CPF is invalid".to_owned(),
                FieldErrorKind::EmailInvalid => "Please provide a valid email address".to_owned(),
                FieldErrorKind::ColorInvalid => "Please select a valid color".to_owned(),
            }
        }
    }
}
