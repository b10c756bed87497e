//! Suggest and geocode passthrough - POST /api/suggest, POST /api/geocode

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tower_sessions::Session;

use super::{require_key, required_field};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeRequest {
    #[serde(default)]
    pub uri: Option<String>,
}

pub async fn suggest(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<SuggestRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let query = required_field(payload, |body| body.query, "Query is required.")?;
    let key = require_key(&session).await?;

    let body = state
        .upstream
        .suggest(&key, &query)
        .await
        .map_err(ApiError::upstream("Error fetching suggestions"))?;

    Ok(json_passthrough(body))
}

pub async fn geocode(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<GeocodeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let uri = required_field(payload, |body| body.uri, "URI is required.")?;
    let key = require_key(&session).await?;

    let body = state
        .upstream
        .geocode(&key, &uri)
        .await
        .map_err(ApiError::upstream("Error fetching geocode data"))?;

    Ok(json_passthrough(body))
}

/// Upstream JSON relayed byte for byte.
fn json_passthrough(body: Bytes) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
