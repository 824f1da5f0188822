use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::sync::Arc;

use crate::metrics;
use crate::services::AppState;

pub mod auth;
pub mod i18n;
pub mod lessons;
pub mod modules;
pub mod parent;
pub mod profile;
pub mod progress;
pub mod settings;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status_code, status, store) = match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            "healthy",
            json!({ "status": "healthy", "message": "Document store reachable" }),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "degraded",
                json!({ "status": "unhealthy", "error": e.to_string() }),
            )
        }
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "service": "philokids-api",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": { "store": store }
        })),
    )
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

/// HTTP Basic auth for `/metrics`. Credentials come from `METRICS_AUTH`
/// as `username:password`.
pub async fn metrics_auth_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let encoded = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let credentials = String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let expected = std::env::var("METRICS_AUTH").unwrap_or_else(|_| "admin:changeme".to_string());
    if credentials != expected {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}
