use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

pub mod config;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod i18n;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

/// Adds a Content-Security-Policy header to every response.
async fn csp_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    response
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(middlewares::auth::LOCALE_HEADER),
        ])
        .allow_origin(tower_http::cors::Any);

    let protected = protected_routes().route_layer(middleware::from_fn_with_state(
        app_state.clone(),
        middlewares::auth::auth_middleware,
    ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        .nest("/api/v1/i18n", i18n_routes())
        .nest("/api/v1/auth", auth_routes(app_state.clone()))
        .merge(protected)
        .with_state(app_state)
        .layer(cors)
        .layer(middleware::from_fn(csp_middleware))
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn i18n_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/{locale}", get(handlers::i18n::get_table))
        .route("/{locale}/{key}", get(handlers::i18n::get_key))
}

fn auth_routes(app_state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public_routes = Router::new()
        .route("/sign-up", post(handlers::auth::sign_up))
        .route("/sign-in", post(handlers::auth::sign_in));

    let session_routes = Router::new()
        .route("/me", get(handlers::auth::current_user))
        .route("/sign-out", post(handlers::auth::sign_out))
        .route_layer(middleware::from_fn_with_state(
            app_state,
            middlewares::auth::auth_middleware,
        ));

    public_routes.merge(session_routes)
}

fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/modules", get(handlers::modules::list_modules))
        .route("/api/v1/modules/{module_id}", get(handlers::modules::get_module))
        .route(
            "/api/v1/modules/{module_id}/lessons/{lesson_id}/complete",
            post(handlers::lessons::complete_lesson),
        )
        .route(
            "/api/v1/modules/{module_id}/lessons/{lesson_id}/quiz",
            post(handlers::lessons::submit_quiz),
        )
        .route("/api/v1/progress", get(handlers::progress::list_progress))
        .route("/api/v1/progress/summary", get(handlers::progress::summary))
        .route(
            "/api/v1/progress/achievements",
            get(handlers::progress::achievements),
        )
        .route(
            "/api/v1/progress/activity",
            get(handlers::progress::recent_activity),
        )
        .route(
            "/api/v1/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .route("/api/v1/parent/dashboard", get(handlers::parent::dashboard))
        .route(
            "/api/v1/profile/avatar",
            axum::routing::put(handlers::profile::upload_avatar).layer(
                RequestBodyLimitLayer::new(handlers::profile::AVATAR_BODY_LIMIT),
            ),
        )
}
