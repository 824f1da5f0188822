use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::{i18n::Locale, services::AppState};

fn resolve(state: &AppState, code: &str) -> Locale {
    code.parse().unwrap_or_else(|_| {
        tracing::debug!("Unsupported locale '{}', using default", code);
        state.translations.default_locale()
    })
}

/// GET /api/v1/i18n/{locale}
pub async fn get_table(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    let locale = resolve(&state, &code);
    Json(json!({
        "locale": locale,
        "translations": state.translations.table(locale),
    }))
}

/// GET /api/v1/i18n/{locale}/{key}
pub async fn get_key(
    State(state): State<Arc<AppState>>,
    Path((code, key)): Path<(String, String)>,
) -> impl IntoResponse {
    let locale = resolve(&state, &code);
    let value = state.translations.translate(locale, &key).to_string();
    Json(json!({
        "locale": locale,
        "key": key,
        "value": value,
    }))
}
