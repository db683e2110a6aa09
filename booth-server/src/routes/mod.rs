//! Router assembly
//!
//! [`build_router`] registers every API route; [`build_app`] adds the
//! tower-http middleware stack on top.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::core::{Config, ServerState};

pub mod logging;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(api::health::router())
        // Print request queue
        .merge(api::print_requests::router())
}

/// Build a fully configured application with all middleware
///
/// Used by the HTTP server and by the integration tests.
pub fn build_app(config: &Config) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // Body limit - image payloads are large
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Request logging
        .layer(axum_middleware::from_fn(logging::logging_middleware))
        // Trace - Request tracing
        .layer(TraceLayer::new_for_http())
        // ========== Request ID ==========
        // Propagate request ID to response (inner, sees the generated id)
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        // Generate unique ID for each request (outermost)
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
}
