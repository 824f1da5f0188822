use axum::{
    extract::{Query, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    errors::ApiError,
    models::{
        activity::ActivityQuery, default_achievements, Achievement, ProgressSummary,
        SessionContext, UserActivity, UserProgress,
    },
    services::AppState,
};

/// GET /api/v1/progress
pub async fn list_progress(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<Vec<UserProgress>>, ApiError> {
    let records = state.progress().progress_for_user(&session.user.id).await?;
    Ok(Json(records))
}

/// GET /api/v1/progress/summary
pub async fn summary(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<ProgressSummary>, ApiError> {
    let summary = state.progress().summary_for(&session.user.id).await?;
    Ok(Json(summary))
}

/// GET /api/v1/progress/achievements
pub async fn achievements(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<Vec<Achievement>>, ApiError> {
    let earned = state
        .progress()
        .achievements_for(&session.user.id, &default_achievements())
        .await?;
    Ok(Json(earned))
}

/// GET /api/v1/progress/activity?limit=
pub async fn recent_activity(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<UserActivity>>, ApiError> {
    let activity = state
        .progress()
        .recent_activity(&session.user.id, query.limit)
        .await?;
    Ok(Json(activity))
}
