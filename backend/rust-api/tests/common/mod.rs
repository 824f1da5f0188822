#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use philokids_api::{
    config::Config,
    create_router,
    models::dashboard::{ChildAccount, ROSTERS_COLLECTION},
    services::{
        blob_store::InMemoryBlobStore,
        content::{StaticContentRepository, StoreRosterRepository},
        identity::StoreIdentityProvider,
        store::{self, DocumentStore, InMemoryDocumentStore},
        AppState,
    },
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub blobs: Arc<InMemoryBlobStore>,
}

pub fn create_test_app() -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let config = Config::in_memory("integration-test-secret");
    let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
    let blobs = Arc::new(InMemoryBlobStore::new());
    let identity = Arc::new(
        StoreIdentityProvider::new(store.clone(), &config.jwt_secret, config.session_ttl_seconds)
            .with_hash_cost(4),
    );

    let state = Arc::new(AppState::with_identity(
        config,
        store.clone(),
        blobs.clone(),
        identity,
        Arc::new(StaticContentRepository::seeded()),
        Arc::new(StoreRosterRepository::new(store)),
    ));

    TestApp {
        router: create_router(state.clone()),
        state,
        blobs,
    }
}

pub struct SignedUp {
    pub token: String,
    pub user_id: String,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body).to_string())
            })
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn sign_up(&self, email: &str, display_name: &str) -> SignedUp {
        let (status, body) = self
            .send_json(
                "POST",
                "/api/v1/auth/sign-up",
                None,
                json!({
                    "email": email,
                    "password": "Wisdom123",
                    "displayName": display_name,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "sign-up failed: {}", body);

        SignedUp {
            token: body["token"].as_str().unwrap().to_string(),
            user_id: body["user"]["id"].as_str().unwrap().to_string(),
        }
    }

    pub async fn complete(&self, token: &str, module_id: &str, lesson_id: u32) -> (StatusCode, Value) {
        self.send_json(
            "POST",
            &format!("/api/v1/modules/{}/lessons/{}/complete", module_id, lesson_id),
            Some(token),
            json!({}),
        )
        .await
    }

    pub async fn link_children(&self, parent_id: &str, children: Vec<ChildAccount>) {
        store::save(
            self.state.store.as_ref(),
            ROSTERS_COLLECTION,
            parent_id,
            &json!({ "children": children }),
        )
        .await
        .unwrap();
    }
}
