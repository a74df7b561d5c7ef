//! HTTP client for the registration API.
//!
//! Errors carry the server's localized message when the response is a JSON
//! envelope, and a localized fallback per status when it is not (rate
//! limiter rejections, proxies, dropped connections).

use customer_registry_core::api::{ApiFailure, ApiResponse};
use customer_registry_core::i18n::Message;
use customer_registry_core::{CustomerData, Locale, NormalizedCustomer};
use reqwest::StatusCode;
use thiserror::Error;

/// Error code used when the request never reached the server.
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";

/// Error code used when the response could not be interpreted.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// A failed API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ClientError {
    /// HTTP status, absent for network failures.
    pub status: Option<u16>,
    /// Envelope error code, or a client-side code.
    pub code: Option<String>,
    /// Localized, user-facing message.
    pub message: String,
}

impl ClientError {
    /// Build an error from a non-success response.
    #[must_use]
    pub fn from_response(status: StatusCode, failure: Option<ApiFailure>, locale: Locale) -> Self {
        let fallback = match status {
            StatusCode::BAD_REQUEST => Message::InvalidData,
            StatusCode::CONFLICT => Message::AlreadyRegistered,
            StatusCode::TOO_MANY_REQUESTS => Message::TooManyRequests,
            StatusCode::INTERNAL_SERVER_ERROR => Message::ServerError,
            StatusCode::SERVICE_UNAVAILABLE => Message::ServiceTemporarilyUnavailable,
            _ => Message::Unexpected,
        };

        match failure {
            Some(failure) if !failure.message.is_empty() => Self {
                status: Some(status.as_u16()),
                code: Some(failure.error.as_str().to_owned()),
                message: failure.message,
            },
            failure => Self {
                status: Some(status.as_u16()),
                code: failure.map(|f| f.error.as_str().to_owned()),
                message: fallback.text(locale),
            },
        }
    }

    /// The server could not be reached.
    #[must_use]
    pub fn network(locale: Locale) -> Self {
        Self {
            status: None,
            code: Some(NETWORK_ERROR.to_owned()),
            message: Message::NetworkError.text(locale),
        }
    }

    /// A success status with a body we could not read.
    #[must_use]
    pub fn unexpected(status: StatusCode, locale: Locale) -> Self {
        Self {
            status: Some(status.as_u16()),
            code: Some(UNKNOWN_ERROR.to_owned()),
            message: Message::Unexpected.text(locale),
        }
    }
}

/// Client for a running registration server.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
    locale: Locale,
}

impl RegistryClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:3000`).
    #[must_use]
    pub fn new(base_url: &str, locale: Locale) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            locale,
        }
    }

    /// Submit a validated registration.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] for any non-201 response or network failure.
    pub async fn create_customer(
        &self,
        customer: &NormalizedCustomer,
    ) -> Result<CustomerData, ClientError> {
        let url = format!("{}/api/customers", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(customer)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "Request failed");
                ClientError::network(self.locale)
            })?;

        let status = response.status();
        let body = response.json::<ApiResponse<CustomerData>>().await.ok();

        match body {
            Some(ApiResponse::Success(success)) if status.is_success() => Ok(success.data),
            Some(ApiResponse::Failure(failure)) => {
                Err(ClientError::from_response(status, Some(failure), self.locale))
            }
            _ if status.is_success() => Err(ClientError::unexpected(status, self.locale)),
            _ => Err(ClientError::from_response(status, None, self.locale)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use customer_registry_core::api::ErrorCode;
    use customer_registry_core::validate;
    use customer_registry_server::config::ServerConfig;
    use customer_registry_server::db::MemoryCustomerStore;
    use customer_registry_server::state::AppState;
    use serde_json::json;

    use super::*;

    /// Serve the real router on an ephemeral port and return its base URL.
    async fn spawn_server() -> String {
        let config = ServerConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("memory:".to_owned()),
            "REGISTRY_LOCALE" => Some("en".to_owned()),
            _ => None,
        })
        .unwrap();
        let app = customer_registry_server::app(AppState::new(
            config,
            Arc::new(MemoryCustomerStore::new()),
        ));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn customer(tax_id: &str, email: &str) -> NormalizedCustomer {
        validate(&json!({
            "fullName": "John Doe",
            "cpf": tax_id,
            "email": email,
            "favoriteColor": "GREEN",
        }))
        .unwrap()
    }

    #[test]
    fn test_envelope_message_wins() {
        let failure = ApiFailure::new(
            ErrorCode::DuplicateEntry,
            "A customer with this email already exists".to_owned(),
        );
        let err = ClientError::from_response(StatusCode::CONFLICT, Some(failure), Locale::En);

        assert_eq!(err.status, Some(409));
        assert_eq!(err.code.as_deref(), Some("DUPLICATE_ENTRY"));
        assert_eq!(err.message, "A customer with this email already exists");
    }

    #[test]
    fn test_fallback_messages_per_status() {
        let cases = [
            (StatusCode::BAD_REQUEST, Message::InvalidData),
            (StatusCode::CONFLICT, Message::AlreadyRegistered),
            (StatusCode::TOO_MANY_REQUESTS, Message::TooManyRequests),
            (StatusCode::INTERNAL_SERVER_ERROR, Message::ServerError),
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Message::ServiceTemporarilyUnavailable,
            ),
            (StatusCode::IM_A_TEAPOT, Message::Unexpected),
        ];

        for (status, message) in cases {
            let err = ClientError::from_response(status, None, Locale::PtBr);
            assert_eq!(err.status, Some(status.as_u16()));
            assert_eq!(err.message, message.text(Locale::PtBr));
        }
    }

    #[test]
    fn test_network_error() {
        let err = ClientError::network(Locale::PtBr);
        assert_eq!(err.status, None);
        assert_eq!(err.code.as_deref(), Some(NETWORK_ERROR));
        assert_eq!(err.to_string(), "Erro de rede. Verifique sua conexão.");
    }

    #[tokio::test]
    async fn test_register_against_server() {
        let base_url = spawn_server().await;
        let client = RegistryClient::new(&base_url, Locale::En);

        let created = client
            .create_customer(&customer("529.982.247-25", "John@Example.com"))
            .await
            .unwrap();
        assert_eq!(created.email, "john@example.com");
        assert_eq!(created.full_name, "John Doe");

        let err = client
            .create_customer(&customer("52998224725", "other@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.status, Some(409));
        assert_eq!(err.message, "A customer with this CPF already exists");
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RegistryClient::new(&format!("http://{addr}/"), Locale::En);
        let err = client
            .create_customer(&customer("52998224725", "john@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.code.as_deref(), Some(NETWORK_ERROR));
    }
}
