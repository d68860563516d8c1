use anyhow::anyhow;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use serde::Deserialize;
use tracing::error;

use banter_store::log::ImageBlob;
use banter_types::api::NewMessageRequest;

use crate::AppState;
use crate::error::ApiError;
use crate::middleware::AuthedUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesQuery {
    /// Cursor: id of the last message the client has seen.
    pub from_id: Option<String>,
}

pub async fn get_messages(
    State(state): State<AppState>,
    Query(query): Query<MessagesQuery>,
    Extension(_user): Extension<AuthedUser>,
) -> Result<impl IntoResponse, ApiError> {
    // An empty fromId means "no cursor", same as leaving it off.
    let from_id = query.from_id.filter(|id| !id.is_empty());

    // Blocking SQLite read off the async runtime.
    let log = state.log.clone();
    let messages = tokio::task::spawn_blocking(move || log.query(from_id.as_deref()))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow!("task join failure"))
        })??;

    Ok(Json(messages))
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(AuthedUser(authenticated)): Extension<AuthedUser>,
    Json(req): Json<NewMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.gate.authorize_write(&req.username, &authenticated)?;

    let image = match &req.image_data {
        Some(image) => Some(ImageBlob {
            bytes: B64
                .decode(&image.data)
                .map_err(|_| ApiError::BadRequest("Invalid image payload.".to_string()))?,
            extension: image.kind.clone(),
        }),
        None => None,
    };

    let log = state.log.clone();
    let author = req.username.clone();
    let text = req.text;
    let message = tokio::task::spawn_blocking(move || log.append(&author, &text, image))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow!("task join failure"))
        })??;

    // Signal viewers only once the append is durable. Delivery failures
    // are the hub's problem, never this request's.
    state.hub.broadcast().await;

    Ok((StatusCode::CREATED, Json(message)))
}
