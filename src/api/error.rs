//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::triage_service::ImageAnalysisError;

/// Hint returned with image errors so the client can fall back to text.
pub const DESCRIBE_MANUALLY: &str =
    "Please describe any visible symptoms or medical findings in the text field.";

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Image rejected: {0}")]
    InvalidImage(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, fallback_message) = match &self {
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                detail.clone(),
                None,
            ),
            ApiError::ServiceUnavailable(detail) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                detail.clone(),
                Some(DESCRIBE_MANUALLY),
            ),
            ApiError::InvalidImage(detail) => (
                StatusCode::BAD_REQUEST,
                "INVALID_IMAGE",
                detail.clone(),
                Some(DESCRIBE_MANUALLY),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
            fallback_message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ImageAnalysisError> for ApiError {
    fn from(err: ImageAnalysisError) -> Self {
        match err {
            ImageAnalysisError::VisionUnavailable => ApiError::ServiceUnavailable(err.to_string()),
            ImageAnalysisError::Image(e) => {
                ApiError::InvalidImage(format!("Failed to process image: {e}"))
            }
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Worker task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::image::ImageError;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn bad_request_returns_400_with_message() {
        let response = ApiError::BadRequest("Missing required field: age".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(json["error"]["message"], "Missing required field: age");
        assert!(json.get("fallback_message").is_none());
    }

    #[tokio::test]
    async fn vision_unavailable_returns_503_with_hint() {
        let response = ApiError::from(ImageAnalysisError::VisionUnavailable).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "SERVICE_UNAVAILABLE");
        assert_eq!(json["error"]["message"], "Image analysis service not available");
        assert_eq!(json["fallback_message"], DESCRIBE_MANUALLY);
    }

    #[tokio::test]
    async fn undecodable_image_returns_400() {
        let err = ImageAnalysisError::Image(ImageError::Decode("bad header".into()));
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "INVALID_IMAGE");
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to process image"));
    }

    #[tokio::test]
    async fn internal_returns_500() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        // Internal errors hide details from client
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }
}
