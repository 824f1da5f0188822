use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    errors::ApiError,
    extractors::AppJson,
    models::{
        progress::CompleteLessonResponse,
        quiz::{QuizResult, QuizSubmission},
        Lesson, Module, SessionContext,
    },
    services::{progress_service::ActivityLabels, quiz_service, AppState},
};

async fn find_module(
    state: &AppState,
    module_id: &str,
    lesson_id: &str,
) -> Result<(Module, u32), ApiError> {
    if module_id.trim().is_empty() || lesson_id.trim().is_empty() {
        return Err(ApiError::bad_request("Module id and lesson id are required"));
    }
    let lesson_id: u32 = lesson_id
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid lesson id: {}", lesson_id)))?;

    let module = state
        .content
        .get_module(module_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Module {} not found", module_id)))?;

    Ok((module, lesson_id))
}

fn lesson_of(module: &Module, lesson_id: u32) -> Result<&Lesson, ApiError> {
    module.lesson(lesson_id).ok_or_else(|| {
        ApiError::not_found(format!(
            "Lesson {} not found in module {}",
            lesson_id, module.id
        ))
    })
}

/// POST /api/v1/modules/{module_id}/lessons/{lesson_id}/complete
pub async fn complete_lesson(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path((module_id, lesson_id)): Path<(String, String)>,
) -> Result<Json<CompleteLessonResponse>, ApiError> {
    let (module, lesson_id) = find_module(&state, &module_id, &lesson_id).await?;
    let lesson = lesson_of(&module, lesson_id)?;

    let outcome = state
        .progress()
        .record_lesson_completion(
            &session.user.id,
            &module.id,
            lesson_id,
            ActivityLabels {
                module: &module.title,
                lesson: &lesson.title,
            },
        )
        .await?;

    let module_completed = outcome.progress.is_module_completed();
    Ok(Json(CompleteLessonResponse {
        newly_completed: outcome.transition.changed(),
        module_completed,
        progress: outcome.progress,
    }))
}

/// POST /api/v1/modules/{module_id}/lessons/{lesson_id}/quiz
pub async fn submit_quiz(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path((module_id, lesson_id)): Path<(String, String)>,
    AppJson(submission): AppJson<QuizSubmission>,
) -> Result<Json<QuizResult>, ApiError> {
    let (module, lesson_id) = find_module(&state, &module_id, &lesson_id).await?;
    let lesson = lesson_of(&module, lesson_id)?;

    let result = quiz_service::submit_quiz(
        &state.progress(),
        &session.user.id,
        &module,
        lesson,
        &submission.answers,
    )
    .await?;

    Ok(Json(result))
}
