use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS};

/// Request count and latency per method and normalized path.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &path])
        .observe(duration);

    response
}

/// Collapses per-resource segments to keep label cardinality bounded.
/// Lesson ids are numeric and module ids follow `/modules/`; i18n keys and
/// locales are left alone since both sets are small.
fn normalize_path(path: &str) -> String {
    let mut normalized = Vec::new();
    let mut after_modules = false;

    for segment in path.split('/') {
        if after_modules || is_numeric_id(segment) || is_uuid_like(segment) {
            normalized.push("{id}");
        } else {
            normalized.push(segment);
        }
        after_modules = segment == "modules";
    }

    normalized.join("/")
}

fn is_uuid_like(s: &str) -> bool {
    s.len() == 36 && s.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}

fn is_numeric_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path("/api/v1/modules/stoicism/lessons/2/complete"),
            "/api/v1/modules/{id}/lessons/{id}/complete"
        );
        assert_eq!(normalize_path("/api/v1/modules"), "/api/v1/modules");
        assert_eq!(
            normalize_path("/api/v1/sessions/550e8400-e29b-41d4-a716-446655440000"),
            "/api/v1/sessions/{id}"
        );
        assert_eq!(normalize_path("/health"), "/health");
    }

    #[test]
    fn test_is_numeric_id() {
        assert!(is_numeric_id("123"));
        assert!(!is_numeric_id("abc"));
        assert!(!is_numeric_id(""));
    }
}
