use super::handlers;
use super::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Uploads carry base64 audio inside JSON; allow bodies up to 100 MiB.
const MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        // Health checks
        .route("/health", get(handlers::health_check))
        .route("/ping", post(handlers::ping))
        // Chunked upload protocol
        .route("/upload-chunk", post(handlers::upload_chunk))
        .route("/transcribe-session", post(handlers::transcribe_session))
        // Single-shot transcription
        .route("/transcribe", post(handlers::transcribe))
        // Middleware
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
