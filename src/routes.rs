//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`      - Short link redirect
//! - `GET  /health`      - Health check with database probe
//! - `/api/*`            - Management API (rate limited per IP)
//!
//! # Middleware
//!
//! - **Request id** - `x-request-id` assigned (UUID) and echoed on the response
//! - **Tracing** - Structured request/response logging
//! - **Panic recovery** - Panics become `500 Internal Server Error`
//! - **Timeout** - Requests exceeding the configured timeout get `504`
//! - **Rate limiting** - Per-IP token bucket on `/api`
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{rate_limit, tracing as trace};
use crate::config::ServerConfig;
use crate::state::AppState;
use axum::Router;
use axum::http::{HeaderName, StatusCode};
use axum::routing::get;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;

/// Constructs the application router with all routes and middleware.
///
/// # Errors
///
/// Returns an error if the rate limit settings are rejected.
pub fn app_router(state: AppState, config: &ServerConfig) -> anyhow::Result<NormalizePath<Router>> {
    let request_id = HeaderName::from_static(trace::REQUEST_ID_HEADER);

    let api_router = api::routes::url_routes().layer(rate_limit::layer(
        config.rate_limit_per_second,
        config.rate_limit_burst,
    )?);

    let router = Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            config.request_timeout,
        ))
        .layer(CatchPanicLayer::new())
        .layer(trace::layer())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid));

    Ok(NormalizePathLayer::trim_trailing_slash().layer(router))
}
