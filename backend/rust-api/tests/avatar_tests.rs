use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};

mod common;

fn upload(token: &str, bytes: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri("/api/v1/profile/avatar")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "image/png")
        .body(Body::from(bytes))
        .unwrap()
}

#[tokio::test]
async fn test_avatar_upload_returns_url() {
    let app = common::create_test_app();
    let account = app.sign_up("kid@example.com", "Kid").await;

    let (status, body) = app.send(upload(&account.token, vec![137, 80, 78, 71])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["url"],
        format!("memory://blobs/avatars/{}", account.user_id).as_str()
    );

    let stored = app
        .blobs
        .get(&format!("avatars/{}", account.user_id))
        .await
        .unwrap();
    assert_eq!(stored.1, "image/png");
}

#[tokio::test]
async fn test_empty_avatar_is_rejected() {
    let app = common::create_test_app();
    let account = app.sign_up("kid@example.com", "Kid").await;

    let (status, _) = app.send(upload(&account.token, Vec::new())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_avatar_is_rejected() {
    let app = common::create_test_app();
    let account = app.sign_up("kid@example.com", "Kid").await;

    let (status, _) = app
        .send(upload(&account.token, vec![0; 3 * 1024 * 1024]))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
