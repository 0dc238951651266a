//! Image analysis endpoint (multipart upload).

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::image::upload_content_type;
use crate::triage_service::{ImageAnalysis, ImageAnalysisError};

/// Uploaded form fields of interest.
#[derive(Default)]
struct ImageUpload {
    file_name: Option<String>,
    bytes: Option<Vec<u8>>,
    prompt: Option<String>,
}

/// `POST /api/analyze_image`: describe an uploaded image.
///
/// Form fields: `image` (file, required) and `prompt` (text, optional).
pub async fn analyze_image(
    State(ctx): State<ApiContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ImageAnalysis>, ApiError> {
    if !ctx.service.has_vision() {
        return Err(ImageAnalysisError::VisionUnavailable.into());
    }

    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let upload = read_upload(&mut multipart).await?;

    let (Some(file_name), Some(bytes)) = (upload.file_name, upload.bytes) else {
        return Err(ApiError::BadRequest("No image file provided".into()));
    };
    if file_name.trim().is_empty() {
        return Err(ApiError::BadRequest("No image file selected".into()));
    }
    let Some(content_type) = upload_content_type(&file_name) else {
        return Err(ApiError::BadRequest(
            "Invalid file type. Please upload an image file.".into(),
        ));
    };

    tracing::info!(
        content_type = %content_type,
        upload_bytes = bytes.len(),
        custom_prompt = upload.prompt.is_some(),
        "Image analysis requested"
    );

    let service = ctx.service.clone();
    let prompt = upload.prompt;
    let analysis =
        tokio::task::spawn_blocking(move || service.analyze_image(&bytes, prompt.as_deref()))
            .await??;

    Ok(Json(analysis))
}

async fn read_upload(multipart: &mut Multipart) -> Result<ImageUpload, ApiError> {
    let mut upload = ImageUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("image") => {
                upload.file_name = Some(field.file_name().unwrap_or_default().to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                upload.bytes = Some(data.to_vec());
            }
            Some("prompt") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                upload.prompt = Some(text);
            }
            _ => {}
        }
    }

    Ok(upload)
}
