use axum::{
    http::{header, Method},
    middleware::from_fn,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{
    make_span_with_request_id, request_id::REQUEST_ID_HEADER, request_id_middleware,
};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/xiaoya", xiaoya_routes())
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(cors_layer()),
        )
        .with_state(state)
}

/// Both endpoints are read-only GETs
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::HeaderName::from_static(REQUEST_ID_HEADER)])
}

/// Routes under /api/xiaoya
fn xiaoya_routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(handlers::search))
        .route("/playback", get(handlers::playback))
        // Older clients use the short form
        .route("/play", get(handlers::playback))
}
