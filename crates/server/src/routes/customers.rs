//! Customer registration endpoints.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use customer_registry_core::api::ApiSuccess;
use customer_registry_core::{CustomerData, validate};
use serde_json::Value;
use tracing::instrument;

use crate::error::{ApiError, Result};
use crate::services::demo::{self, SampleRegistration};
use crate::state::AppState;

/// Register a customer.
///
/// The body is taken as untyped JSON so that every field problem is reported
/// by the validator with a localized message instead of a serde rejection.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiSuccess<CustomerData>>)> {
    let locale = state.config().locale;

    let Json(payload) =
        payload.map_err(|e| ApiError::MalformedBody(e.body_text()).localized(locale))?;

    let customer = validate(&payload).map_err(|e| ApiError::from(e).localized(locale))?;

    let stored = state
        .registration()
        .register(customer)
        .await
        .map_err(|e| ApiError::from(e).localized(locale))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiSuccess::new(CustomerData::from(stored))),
    ))
}

/// Random registration payload for demo mode.
#[instrument(skip_all)]
pub async fn sample() -> Json<ApiSuccess<SampleRegistration>> {
    Json(ApiSuccess::new(demo::sample_registration()))
}
