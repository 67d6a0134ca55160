//! Encoder trait and shared imaging errors.
//!
//! The [`JpegEncode`] trait is the one seam of the imaging layer: the
//! quality search in [`search`](super::search) only needs "turn these pixels
//! into bytes at this quality". The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests swap in a mock
//! with a predictable size curve.

use super::params::Quality;
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Encodes a decoded image into JPEG bytes.
///
/// Implementations must be deterministic: the same image and quality always
/// produce the same bytes. The search relies on this to never revisit a
/// quality value.
pub trait JpegEncode {
    fn encode(&self, image: &DynamicImage, quality: Quality) -> Result<Vec<u8>, ImagingError>;
}
