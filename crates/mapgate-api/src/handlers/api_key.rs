//! Key submission and existence check - POST /api/setApiKey, GET /api/checkApiKey

use axum::{extract::rejection::JsonRejection, Json};
use mapgate_session::{ApiKey, ApiKeySession};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::info;

use super::required_field;
use crate::error::ApiError;

/// No `Debug`: the payload carries the secret.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetApiKeyRequest {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckApiKeyResponse {
    pub api_key_exists: bool,
}

pub async fn set_api_key(
    session: Session,
    payload: Result<Json<SetApiKeyRequest>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    let raw = required_field(payload, |body| body.api_key, "API Key is required.")?;
    let key = ApiKey::parse(&raw).ok_or(ApiError::Validation("API Key is required."))?;

    session.set_api_key(key).await?;
    info!("API key stored in session");

    Ok("API Key set successfully.")
}

/// Existence flag only; the key itself never travels back to the browser.
pub async fn check_api_key(session: Session) -> Result<Json<CheckApiKeyResponse>, ApiError> {
    Ok(Json(CheckApiKeyResponse {
        api_key_exists: session.has_api_key().await?,
    }))
}
