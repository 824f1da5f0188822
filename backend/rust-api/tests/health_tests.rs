use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use base64::{engine::general_purpose, Engine as _};

mod common;

#[tokio::test]
async fn test_health_reports_store() {
    let app = common::create_test_app();
    let (status, body) = app
        .send(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["dependencies"]["store"]["status"], "healthy");
}

#[tokio::test]
async fn test_trace_id_is_echoed() {
    let app = common::create_test_app();
    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        Request::builder()
            .uri("/health")
            .header("x-trace-id", "trace-123")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.headers()["x-trace-id"], "trace-123");
}

#[tokio::test]
#[serial_test::serial]
async fn test_metrics_require_basic_auth() {
    std::env::remove_var("METRICS_AUTH");
    let app = common::create_test_app();

    let (status, _) = app
        .send(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let credentials = general_purpose::STANDARD.encode("admin:changeme");
    let (status, body) = app
        .send(
            Request::builder()
                .uri("/metrics")
                .header(header::AUTHORIZATION, format!("Basic {}", credentials))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("http_requests_total"));
}
