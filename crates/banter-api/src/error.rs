use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use banter_auth::error::AuthError;
use banter_store::error::StoreError;

/// Handler-level error. Converts the domain taxonomies into HTTP
/// responses; internal detail is logged here and never leaves the
/// server.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // AuthError display strings are already user-safe.
            ApiError::Auth(err) => (StatusCode::FORBIDDEN, err.to_string()),
            ApiError::Store(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, "Invalid fromId.".to_string())
            }
            ApiError::Store(StoreError::Conflict) => (
                StatusCode::CONFLICT,
                "Account with the same username already exists.".to_string(),
            ),
            ApiError::Store(StoreError::Persistence(detail)) => {
                error!("Store failure: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected error.".to_string())
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ApiError::Internal(err) => {
                error!("Unexpected error: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected error.".to_string())
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
