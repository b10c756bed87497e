//! Map SDK script and tile passthrough - GET /api/map-script, GET /api/map-proxy/{*path}

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use futures::TryStreamExt;
use tower_sessions::Session;

use super::require_key;
use crate::error::ApiError;
use crate::proxy_path::{forwarded_query, TilePath};
use crate::state::AppState;

const JAVASCRIPT: &str = "application/javascript";
const OCTET_STREAM: &str = "application/octet-stream";

pub async fn map_script(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, ApiError> {
    let key = require_key(&session).await?;

    let script = state
        .upstream
        .map_script(&key)
        .await
        .map_err(ApiError::upstream("Error fetching map script"))?;

    Ok(([(header::CONTENT_TYPE, JAVASCRIPT)], script).into_response())
}

pub async fn map_resource(
    State(state): State<AppState>,
    session: Session,
    Path(path): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let path = TilePath::parse(&path)?;
    let key = require_key(&session).await?;
    let query = forwarded_query(query);

    let upstream = state
        .upstream
        .map_resource(&key, &path, &query)
        .await
        .map_err(ApiError::upstream("Error fetching map resource"))?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static(OCTET_STREAM));
    let cache_control = upstream.headers().get(header::CACHE_CONTROL).cloned();

    let body = Body::from_stream(upstream.bytes_stream().map_err(|e| e.without_url()));
    let mut response = Response::new(body);
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    if let Some(value) = cache_control {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }
    Ok(response)
}
