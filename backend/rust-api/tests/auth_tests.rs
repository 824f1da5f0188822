use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;

mod common;

#[tokio::test]
async fn test_sign_up_returns_session() {
    let app = common::create_test_app();
    let (status, body) = app
        .send_json(
            "POST",
            "/api/v1/auth/sign-up",
            None,
            json!({
                "email": "Sophie@Example.com",
                "password": "Wisdom123",
                "displayName": "Sophie",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some());
    assert_eq!(body["user"]["email"], "sophie@example.com");
    assert_eq!(body["user"]["displayName"], "Sophie");
}

#[tokio::test]
async fn test_sign_up_rejects_short_password() {
    let app = common::create_test_app();
    let (status, body) = app
        .send_json(
            "POST",
            "/api/v1/auth/sign-up",
            None,
            json!({
                "email": "short@example.com",
                "password": "abc",
                "displayName": "Shorty",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_duplicate_sign_up_conflicts() {
    let app = common::create_test_app();
    app.sign_up("twin@example.com", "Twin").await;

    let (status, body) = app
        .send_json(
            "POST",
            "/api/v1/auth/sign-up",
            None,
            json!({
                "email": "twin@example.com",
                "password": "Wisdom123",
                "displayName": "Other Twin",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "An account with this email already exists");
}

#[tokio::test]
async fn test_sign_in_with_wrong_password() {
    let app = common::create_test_app();
    app.sign_up("plato@example.com", "Plato").await;

    let (status, body) = app
        .send_json(
            "POST",
            "/api/v1/auth/sign-in",
            None,
            json!({ "email": "plato@example.com", "password": "not-the-one" }),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = common::create_test_app();
    let (status, _) = app
        .send(
            Request::builder()
                .uri("/api/v1/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/v1/auth/me", "garbage").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sign_in_then_me() {
    let app = common::create_test_app();
    let account = app.sign_up("zeno@example.com", "Zeno").await;

    let (status, body) = app
        .send_json(
            "POST",
            "/api/v1/auth/sign-in",
            None,
            json!({ "email": "zeno@example.com", "password": "Wisdom123" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, me) = app.get("/api/v1/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["user"]["id"], account.user_id.as_str());
    assert_eq!(me["locale"], "en");
}

#[tokio::test]
async fn test_sign_out_invalidates_token() {
    let app = common::create_test_app();
    let account = app.sign_up("epictetus@example.com", "Epictetus").await;

    let (status, _) = app
        .send_json("POST", "/api/v1/auth/sign-out", Some(&account.token), json!({}))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get("/api/v1/auth/me", &account.token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/v1/progress", &account.token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
