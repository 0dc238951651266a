//! HTTP router.
//!
//! JSON endpoints are nested under `/api/`; the static frontend is served
//! from the configured directory at `/`, `/css/*` and `/js/*`.
//!
//! Layers (outermost → innermost):
//! 1. Cache-Control: no-store → 2. Request log → 3. Body limit

use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::config::MAX_UPLOAD_BYTES;
use crate::triage_service::TriageService;

/// Build the application router.
pub fn triage_router(service: Arc<TriageService>, static_dir: &Path) -> Router {
    build_router(ApiContext::new(service), static_dir)
}

fn build_router(ctx: ApiContext, static_dir: &Path) -> Router {
    let api = Router::new()
        .route("/analyze", post(endpoints::analyze::analyze))
        .route("/analyze_image", post(endpoints::image::analyze_image))
        .route("/health", get(endpoints::health::check))
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/css", ServeDir::new(static_dir.join("css")))
        .nest_service("/js", ServeDir::new(static_dir.join("js")))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(axum::middleware::from_fn(middleware::request_log::log_request))
        // Responses carry patient data
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
