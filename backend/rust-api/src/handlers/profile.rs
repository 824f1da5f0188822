use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Extension, Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{errors::ApiError, models::SessionContext, services::AppState};

pub const AVATAR_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// PUT /api/v1/profile/avatar
pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::bad_request("Avatar image is empty"));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");
    let path = format!("avatars/{}", session.user.id);

    let url = state
        .blobs
        .upload(body.to_vec(), &path, content_type)
        .await?;

    tracing::info!("Avatar uploaded for {} ({} bytes)", session.user.id, body.len());
    Ok(Json(json!({ "url": url.as_str() })))
}
