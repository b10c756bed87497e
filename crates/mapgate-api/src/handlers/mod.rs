pub mod api_key;
pub mod health;
pub mod map;
pub mod search;

use axum::{extract::rejection::JsonRejection, Json};
use mapgate_session::{ApiKey, ApiKeySession};
use tower_sessions::Session;

use crate::error::ApiError;

/// Key stored in the caller's session, or `KeyNotSet`.
pub(crate) async fn require_key(session: &Session) -> Result<ApiKey, ApiError> {
    session.api_key().await?.ok_or(ApiError::KeyNotSet)
}

/// Pulls one required string field out of a JSON body. A malformed body is
/// treated the same as a missing field.
pub(crate) fn required_field<T>(
    payload: Result<Json<T>, JsonRejection>,
    field: impl FnOnce(T) -> Option<String>,
    message: &'static str,
) -> Result<String, ApiError> {
    payload
        .ok()
        .and_then(|Json(body)| field(body))
        .filter(|value| !value.trim().is_empty())
        .ok_or(ApiError::Validation(message))
}
