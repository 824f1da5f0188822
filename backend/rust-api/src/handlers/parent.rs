use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    errors::ApiError,
    models::{dashboard::ParentDashboard, SessionContext},
    services::{dashboard_service, AppState},
};

/// GET /api/v1/parent/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<ParentDashboard>, ApiError> {
    let dashboard = dashboard_service::parent_dashboard(
        state.roster.as_ref(),
        &state.progress(),
        &session.user.id,
    )
    .await?;
    Ok(Json(dashboard))
}
