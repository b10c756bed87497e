use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mapgate_session::SessionError;
use serde::Serialize;
use thiserror::Error;

use crate::proxy_path::PathRejection;
use crate::upstream::UpstreamError;

/// Handler failure. Every variant maps to a sanitized response: upstream
/// detail is logged, never returned.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("Invalid resource path: {0}")]
    InvalidPath(#[from] PathRejection),

    #[error("API Key is not set.")]
    KeyNotSet,

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        #[source]
        source: UpstreamError,
    },

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl ApiError {
    pub fn upstream(context: &'static str) -> impl FnOnce(UpstreamError) -> Self {
        move |source| ApiError::Upstream { context, source }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::Validation(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "ValidationError", msg.to_string())
            }
            ApiError::InvalidPath(rejection) => {
                tracing::warn!("Rejected resource path: {}", rejection);
                (StatusCode::BAD_REQUEST, "ValidationError", "Invalid resource path.".to_string())
            }
            ApiError::KeyNotSet => {
                tracing::warn!("API Key is not set in the session");
                (StatusCode::BAD_REQUEST, "SessionError", self.to_string())
            }
            ApiError::Upstream { context, source } => {
                tracing::error!("{}: {}", context, source);
                (StatusCode::INTERNAL_SERVER_ERROR, "UpstreamError", context.to_string())
            }
            ApiError::Session(e) => {
                tracing::error!("Session error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "InternalError", "Session error".to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
