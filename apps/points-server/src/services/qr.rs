//! QR code generation.

use std::io::Cursor;

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;

/// Smallest side of a generated QR image, in pixels.
pub const MIN_QR_SIZE: u32 = 200;

/// Errors that can occur while generating a QR image.
#[derive(Debug, thiserror::Error)]
pub enum QrError {
    /// The payload does not fit in a QR code.
    #[error("Cannot encode QR payload: {0}")]
    Encode(String),

    /// PNG encoding failed.
    #[error("Cannot encode PNG: {0}")]
    Image(#[from] image::ImageError),
}

/// Encodes `payload` as a QR code and returns the PNG bytes.
pub fn encode_png(payload: &str) -> Result<Vec<u8>, QrError> {
    let code = QrCode::new(payload.as_bytes()).map_err(|e| QrError::Encode(e.to_string()))?;
    let bitmap = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_QR_SIZE, MIN_QR_SIZE)
        .build();

    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(bitmap).write_to(&mut png, ImageFormat::Png)?;

    Ok(png.into_inner())
}

/// Wraps image bytes in a `data:` URL for inline embedding.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}
