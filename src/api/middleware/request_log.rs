//! Request logging middleware.
//!
//! Tags every request with a fresh id, echoes it in `x-request-id` and logs
//! method, path, status and latency once the response is ready. Bodies are
//! never logged: they carry patient data.

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn log_request(req: Request<axum::body::Body>, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let start = std::time::Instant::now();

    let mut response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = start.elapsed().as_millis();
    if response.status().is_server_error() {
        tracing::warn!(%request_id, %method, %path, status, %elapsed_ms, "Request failed");
    } else {
        tracing::info!(%request_id, %method, %path, status, %elapsed_ms, "Request handled");
    }

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
