//! Image preprocessing for the vision collaborator.
//!
//! Uploads arrive in any common format and size. Before analysis every image
//! is decoded, flattened to RGB, shrunk to fit a 1024×1024 box and re-encoded
//! as JPEG so the provider always receives the same kind of payload.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageOutputFormat};
use serde::Serialize;
use thiserror::Error;

// ──────────────────────────────────────────────
// Constants
// ──────────────────────────────────────────────

/// Longest edge of the image sent for analysis.
pub const MAX_IMAGE_EDGE: u32 = 1024;

/// JPEG quality of the re-encoded image.
pub const JPEG_QUALITY: u8 = 85;

/// File extensions accepted on upload (lowercase, without the dot).
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image data is empty")]
    Empty,

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("JPEG encoding failed: {0}")]
    Encode(String),
}

/// Result of preprocessing: JPEG bytes plus what the caller reports back.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub file_size_kb: usize,
}

/// Format and dimensions echoed to the client after analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub format: String,
    pub size: String,
}

impl ProcessedImage {
    /// Always JPEG after preprocessing.
    pub fn format(&self) -> &'static str {
        "JPEG"
    }

    /// Dimensions as `WIDTHxHEIGHT`.
    pub fn size(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            format: self.format().to_string(),
            size: self.size(),
        }
    }
}

/// Decode, convert to RGB, shrink to fit `MAX_IMAGE_EDGE` and re-encode as JPEG.
///
/// Aspect ratio is preserved. Images already within the box keep their size.
pub fn preprocess_image(bytes: &[u8]) -> Result<ProcessedImage, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }

    let img = image::load_from_memory(bytes).map_err(|e| ImageError::Decode(e.to_string()))?;
    let (orig_w, orig_h) = img.dimensions();

    let img = if orig_w > MAX_IMAGE_EDGE || orig_h > MAX_IMAGE_EDGE {
        img.resize(MAX_IMAGE_EDGE, MAX_IMAGE_EDGE, FilterType::Lanczos3)
    } else {
        img
    };

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let (width, height) = rgb.dimensions();

    let mut cursor = Cursor::new(Vec::new());
    rgb.write_to(&mut cursor, ImageOutputFormat::Jpeg(JPEG_QUALITY))
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    let jpeg = cursor.into_inner();

    tracing::debug!(
        orig_w,
        orig_h,
        width,
        height,
        input_bytes = bytes.len(),
        jpeg_bytes = jpeg.len(),
        "Image preprocessed"
    );

    Ok(ProcessedImage {
        file_size_kb: jpeg.len() / 1024,
        jpeg,
        width,
        height,
    })
}

/// Content type for an uploaded file name, or `None` when its extension is
/// not an accepted image type.
pub fn upload_content_type(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    Some(mime_guess::from_ext(&ext).first_or_octet_stream().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200u8, 120, 80]));
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn small_image_keeps_dimensions() {
        let processed = preprocess_image(&png_bytes(40, 30)).unwrap();
        assert_eq!((processed.width, processed.height), (40, 30));
        assert_eq!(processed.size(), "40x30");
        assert_eq!(processed.format(), "JPEG");
        // JPEG SOI marker
        assert_eq!(&processed.jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn large_image_is_shrunk_preserving_aspect() {
        let processed = preprocess_image(&png_bytes(2048, 1024)).unwrap();
        assert_eq!(processed.width, 1024);
        assert_eq!(processed.height, 512);
        assert_eq!(processed.file_size_kb, processed.jpeg.len() / 1024);
    }

    #[test]
    fn tall_image_fits_the_box() {
        let processed = preprocess_image(&png_bytes(300, 1500)).unwrap();
        assert!(processed.height <= MAX_IMAGE_EDGE);
        assert_eq!(processed.height, 1024);
    }

    #[test]
    fn alpha_channel_is_dropped() {
        let img = RgbaImage::from_pixel(16, 16, image::Rgba([10u8, 20, 30, 128]));
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageOutputFormat::Png)
            .unwrap();
        let processed = preprocess_image(&cursor.into_inner()).unwrap();
        let decoded = image::load_from_memory(&processed.jpeg).unwrap();
        assert!(matches!(decoded, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            preprocess_image(b"definitely not an image"),
            Err(ImageError::Decode(_))
        ));
        assert!(matches!(preprocess_image(&[]), Err(ImageError::Empty)));
    }

    #[test]
    fn upload_extensions_are_checked() {
        assert_eq!(upload_content_type("rash.PNG").as_deref(), Some("image/png"));
        assert_eq!(upload_content_type("wound.jpeg").as_deref(), Some("image/jpeg"));
        assert!(upload_content_type("scan.webp").is_some());
        assert!(upload_content_type("notes.pdf").is_none());
        assert!(upload_content_type("noextension").is_none());
    }
}
