//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use axum::http::HeaderName;
use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::service::AccountService;

pub use routes::create_router;

/// Build the full application: health check, account routes and layers
pub fn build_app(service: AccountService) -> Router {
    let request_id = HeaderName::from_static(middleware::REQUEST_ID_HEADER);

    // Layers run bottom-up: request id -> trace -> logging -> handler
    Router::new()
        .route("/health", get(health_check))
        .merge(create_router())
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(service)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
