use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use std::sync::Arc;
use validator::Validate;

use crate::{
    errors::{ApiError, AuthError},
    extractors::AppJson,
    models::{
        user::{SignInRequest, SignUpRequest},
        SessionContext,
    },
    services::AppState,
};

/// POST /api/v1/auth/sign-up
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<SignUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    tracing::info!("Registering new user: {}", req.email);

    let session = state
        .identity
        .sign_up(&req.email, &req.password, &req.display_name)
        .await
        .map_err(|e| {
            tracing::warn!("Sign-up failed for {}: {}", req.email, e);
            e
        })?;

    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /api/v1/auth/sign-in
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| AuthError::Validation(format!("Validation error: {}", e)))?;

    let session = state.identity.sign_in(&req.email, &req.password).await?;
    Ok(Json(session))
}

/// POST /api/v1/auth/sign-out
pub async fn sign_out(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<impl IntoResponse, ApiError> {
    state.identity.sign_out(&session.token).await?;
    tracing::info!("User {} signed out", session.user.id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn current_user(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "user": session.user,
        "locale": session.locale,
    }))
}
