//! Unified error handling with Sentry integration.
//!
//! Every failure of the create endpoint becomes an [`ApiError`]. Rendering it
//! needs the configured locale, so handlers return [`LocalizedError`], which
//! captures server faults to Sentry before responding with the JSON envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use customer_registry_core::Locale;
use customer_registry_core::ValidationErrors;
use customer_registry_core::api::{ApiFailure, ErrorCode};
use customer_registry_core::i18n::Message;
use thiserror::Error;

use crate::services::RegistrationError;

/// Application-level error type for the registration API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The payload failed one or more field rules.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The body was not a JSON document.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// Duplicate, store outage or unexpected store failure.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::Registration(RegistrationError::Duplicate(_)) => StatusCode::CONFLICT,
            Self::Registration(RegistrationError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Registration(RegistrationError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for the envelope.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) => ErrorCode::ValidationError,
            Self::Registration(RegistrationError::Duplicate(_)) => ErrorCode::DuplicateEntry,
            Self::Registration(RegistrationError::Unavailable(_)) => ErrorCode::ServiceUnavailable,
            Self::Registration(RegistrationError::Internal(_)) => ErrorCode::InternalError,
        }
    }

    /// User-facing message. Never includes store error details.
    #[must_use]
    pub fn message(&self, locale: Locale) -> String {
        match self {
            Self::Validation(errors) => errors.first().map_or_else(
                || Message::InvalidRequestData.text(locale),
                |error| error.message(locale),
            ),
            Self::MalformedBody(_) => Message::InvalidRequestData.text(locale),
            Self::Registration(RegistrationError::Duplicate(field)) => {
                Message::Duplicate(*field).text(locale)
            }
            Self::Registration(RegistrationError::Unavailable(_)) => {
                Message::ServiceUnavailable.text(locale)
            }
            Self::Registration(RegistrationError::Internal(_)) => {
                Message::InternalError.text(locale)
            }
        }
    }

    /// Whether this is our fault rather than the client's.
    #[must_use]
    pub fn is_server_fault(&self) -> bool {
        self.status().is_server_error()
    }

    /// Attach the locale used to render the message.
    #[must_use]
    pub const fn localized(self, locale: Locale) -> LocalizedError {
        LocalizedError {
            error: self,
            locale,
        }
    }
}

/// An [`ApiError`] ready to render in a specific locale.
#[derive(Debug)]
pub struct LocalizedError {
    error: ApiError,
    locale: Locale,
}

impl IntoResponse for LocalizedError {
    fn into_response(self) -> Response {
        let Self { error, locale } = self;

        if error.is_server_fault() {
            let event_id = sentry::capture_error(&error);
            tracing::error!(
                error = %error,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %error, "Request rejected");
        }

        let body = ApiFailure::new(error.code(), error.message(locale));
        (error.status(), Json(body)).into_response()
    }
}

/// Result type alias for handlers.
pub type Result<T> = std::result::Result<T, LocalizedError>;
