//! Pure Rust JPEG backend on top of `image::codecs::jpeg::JpegEncoder`.
//!
//! 8-bit gray and RGB buffers are encoded as-is. Everything else (alpha,
//! 16-bit, float) is flattened to RGB8 first.

use super::backend::{ImagingError, JpegEncode};
use super::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType};

/// JPEG encoder backed by the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode raw samples into an in-memory JPEG.
fn encode_samples(
    samples: &[u8],
    width: u32,
    height: u32,
    color: ExtendedColorType,
    quality: Quality,
) -> Result<Vec<u8>, ImagingError> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality.value());
    encoder
        .encode(samples, width, height, color)
        .map_err(|e| ImagingError::Encode(format!("JPEG encode at quality {quality} failed: {e}")))?;
    Ok(buf)
}

impl JpegEncode for RustBackend {
    fn encode(&self, image: &DynamicImage, quality: Quality) -> Result<Vec<u8>, ImagingError> {
        let (width, height) = (image.width(), image.height());
        match image {
            DynamicImage::ImageLuma8(gray) => {
                encode_samples(gray.as_raw(), width, height, ExtendedColorType::L8, quality)
            }
            DynamicImage::ImageRgb8(rgb) => {
                encode_samples(rgb.as_raw(), width, height, ExtendedColorType::Rgb8, quality)
            }
            // JPEG has no alpha and no high bit depths: flatten to RGB8
            other => {
                let rgb = other.to_rgb8();
                encode_samples(rgb.as_raw(), width, height, ExtendedColorType::Rgb8, quality)
            }
        }
    }
}
