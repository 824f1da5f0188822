use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{
    errors::ApiError,
    models::{content::ModuleSummary, Module},
    services::AppState,
};

/// GET /api/v1/modules
pub async fn list_modules(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ModuleSummary>>, ApiError> {
    let modules = state.content.list_modules().await?;
    Ok(Json(modules.iter().map(ModuleSummary::from).collect()))
}

/// GET /api/v1/modules/{module_id}
pub async fn get_module(
    State(state): State<Arc<AppState>>,
    Path(module_id): Path<String>,
) -> Result<Json<Module>, ApiError> {
    let module = state
        .content
        .get_module(&module_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Module {} not found", module_id)))?;
    Ok(Json(module))
}
