// src/storage/photo.rs

use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

/// Quality used when re-encoding uploads.
pub const JPEG_QUALITY: u8 = 70;

/// Returned when the picked bytes are not a decodable picture.
pub const IMAGE_DECODE_FAILED: &str = "failed to convert image to data";

/// Image bytes ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub extension: &'static str,
}

/// Turns picked-image bytes into an uploadable blob.
pub trait ImageEncoder {
    fn encode(&self, raw: &[u8]) -> Result<EncodedImage, String>;
}

/// Decodes whatever the browser or phone handed us (JPEG, PNG, GIF, WebP)
/// and re-encodes it as a quality-reduced JPEG.
#[derive(Debug, Clone, Copy)]
pub struct JpegCompressor {
    quality: u8,
}

impl JpegCompressor {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Default for JpegCompressor {
    fn default() -> Self {
        Self::new(JPEG_QUALITY)
    }
}

impl ImageEncoder for JpegCompressor {
    fn encode(&self, raw: &[u8]) -> Result<EncodedImage, String> {
        let decoded = image::load_from_memory(raw).map_err(|e| {
            tracing::debug!(error = %e, len = raw.len(), "picked image did not decode");
            IMAGE_DECODE_FAILED.to_string()
        })?;

        // JPEG has no alpha channel
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(rgb)
            .write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, self.quality))
            .map_err(|e| format!("jpeg encoding failed: {e}"))?;

        tracing::debug!(
            width,
            height,
            in_len = raw.len(),
            out_len = bytes.len(),
            "image re-encoded"
        );

        Ok(EncodedImage {
            bytes,
            content_type: "image/jpeg",
            extension: "jpg",
        })
    }
}
