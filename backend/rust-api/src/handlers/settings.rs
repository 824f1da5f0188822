use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    errors::ApiError,
    extractors::AppJson,
    models::{SessionContext, UserSettings},
    services::AppState,
};

/// GET /api/v1/settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<UserSettings>, ApiError> {
    Ok(Json(state.settings().get(&session.user.id).await?))
}

/// PUT /api/v1/settings
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    AppJson(settings): AppJson<UserSettings>,
) -> Result<Json<UserSettings>, ApiError> {
    let saved = state.settings().upsert(&session.user.id, settings).await?;
    Ok(Json(saved))
}
