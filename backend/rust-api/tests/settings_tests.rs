use axum::http::StatusCode;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_settings_default_when_absent() {
    let app = common::create_test_app();
    let account = app.sign_up("kid@example.com", "Kid").await;

    let (status, settings) = app.get("/api/v1/settings", &account.token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["userId"], account.user_id.as_str());
    assert_eq!(settings["emailNotifications"], true);
    assert_eq!(settings["language"], "en");
}

#[tokio::test]
async fn test_put_settings_ignores_body_owner() {
    let app = common::create_test_app();
    let account = app.sign_up("parent@example.com", "Parent").await;

    let (status, saved) = app
        .send_json(
            "PUT",
            "/api/v1/settings",
            Some(&account.token),
            json!({
                "userId": "someone-else",
                "emailNotifications": false,
                "progressUpdates": true,
                "language": "lt",
                "parentalControls": { "maxDailyTime": 30, "restrictedModules": ["logic"] }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["userId"], account.user_id.as_str());

    let (_, loaded) = app.get("/api/v1/settings", &account.token).await;
    assert_eq!(loaded["language"], "lt");
    assert_eq!(loaded["emailNotifications"], false);
    assert_eq!(loaded["parentalControls"]["maxDailyTime"], 30);
}

#[tokio::test]
async fn test_stored_language_drives_session_locale() {
    let app = common::create_test_app();
    let account = app.sign_up("kid@example.com", "Kid").await;

    app.send_json(
        "PUT",
        "/api/v1/settings",
        Some(&account.token),
        json!({
            "emailNotifications": true,
            "progressUpdates": true,
            "language": "lt"
        }),
    )
    .await;

    let (_, me) = app.get("/api/v1/auth/me", &account.token).await;
    assert_eq!(me["locale"], "lt");
}

#[tokio::test]
async fn test_locale_header_overrides_settings() {
    use axum::{
        body::Body,
        http::{header, Request},
    };

    let app = common::create_test_app();
    let account = app.sign_up("kid@example.com", "Kid").await;

    let (status, me) = app
        .send(
            Request::builder()
                .uri("/api/v1/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {}", account.token))
                .header("x-locale", "lt")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["locale"], "lt");
}

#[tokio::test]
async fn test_invalid_settings_body_is_rejected() {
    let app = common::create_test_app();
    let account = app.sign_up("kid@example.com", "Kid").await;

    let (status, _) = app
        .send_json(
            "PUT",
            "/api/v1/settings",
            Some(&account.token),
            json!({ "language": "fr" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
