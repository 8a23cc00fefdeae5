use crate::infrastructure::http::controllers;
use crate::infrastructure::http::middleware::{ApiError, ApiResult, AppState};
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderName, Method},
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

pub const API_VERSION: &str = "/api/v1";

pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    let api = Router::new()
        .route("/logs", post(controllers::logs::create_log))
        .route(
            "/events/:application_id",
            get(controllers::events::log_stream),
        );

    Router::new()
        .route("/health", get(health_handler))
        .nest(API_VERSION, api)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-api-key"),
        ])
        .max_age(Duration::from_secs(300))
}

async fn health_handler(State(state): State<AppState>) -> ApiResult<&'static str> {
    state.db.health_check().await.map_err(|e| {
        tracing::warn!("Health check failed: {}", e);
        ApiError::ServiceUnavailable("Database unreachable".to_string())
    })?;
    Ok("OK")
}
