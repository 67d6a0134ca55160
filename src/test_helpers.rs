//! Shared test utilities for the jpegfit test suite.
//!
//! Synthetic images only: nothing here reads fixtures from disk, so every
//! test owns its inputs and can write them into its own `TempDir`.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let path = tmp.path().join("rotated.jpg");
//! std::fs::write(&path, jpeg_with_orientation(16, 8, 6)).unwrap();
//! ```

use image::{DynamicImage, ImageEncoder, Rgb, RgbImage};
use std::path::Path;

// =========================================================================
// Pixel sources
// =========================================================================

/// Smooth RGB gradient. Compresses well at every quality.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    }))
}

/// Deterministic pseudo-random noise (xorshift). Hard to compress, so the
/// encoded size reacts strongly to quality.
pub fn noise_image(width: u32, height: u32, seed: u32) -> DynamicImage {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgb([r, g, b])
    }))
}

/// Left half pure red, right half pure blue. Used to check rotations after a
/// lossy round trip.
pub fn split_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    })
}

// =========================================================================
// Encoded files
// =========================================================================

/// Encode an RGB buffer as a plain JPEG (no metadata).
pub fn encode_jpeg(img: &RgbImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, 95)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
    buf
}

/// A [`split_image`] JPEG carrying an EXIF APP1 segment with the given
/// orientation code.
pub fn jpeg_with_orientation(width: u32, height: u32, code: u16) -> Vec<u8> {
    let jpeg = encode_jpeg(&split_image(width, height));
    insert_exif_orientation(&jpeg, code)
}

/// Splice a minimal big-endian EXIF block (one IFD0 entry: Orientation)
/// right after the JPEG SOI marker.
pub fn insert_exif_orientation(jpeg: &[u8], code: u16) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(b"Exif\0\0");
    // TIFF header: big-endian, magic 42, IFD0 at offset 8
    payload.extend_from_slice(&[b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08]);
    // IFD0 with a single entry
    payload.extend_from_slice(&1u16.to_be_bytes());
    payload.extend_from_slice(&0x0112u16.to_be_bytes()); // Orientation
    payload.extend_from_slice(&3u16.to_be_bytes()); // SHORT
    payload.extend_from_slice(&1u32.to_be_bytes()); // count
    payload.extend_from_slice(&code.to_be_bytes());
    payload.extend_from_slice(&[0x00, 0x00]); // value padding
    payload.extend_from_slice(&0u32.to_be_bytes()); // no next IFD
    insert_app1(jpeg, &payload)
}

/// Splice an APP1 segment carrying `payload` right after the SOI marker.
pub fn insert_app1(jpeg: &[u8], payload: &[u8]) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG");

    let mut out = Vec::with_capacity(jpeg.len() + payload.len() + 4);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Write a gradient PNG to `path`.
pub fn write_png(path: &Path, width: u32, height: u32) {
    gradient_image(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Write a gradient JPEG (no metadata) to `path`.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    let rgb = gradient_image(width, height).to_rgb8();
    std::fs::write(path, encode_jpeg(&rgb)).unwrap();
}

/// Create every parent directory of `path`, then an empty file at it.
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"").unwrap();
}

// =========================================================================
// Pixel assertions
// =========================================================================

/// Whether the pixel at (x, y) is clearly more red than blue.
pub fn is_reddish(img: &DynamicImage, x: u32, y: u32) -> bool {
    let px = img.to_rgb8().get_pixel(x, y).0;
    px[0] as i32 - px[2] as i32 > 64
}

/// Whether the pixel at (x, y) is clearly more blue than red.
pub fn is_bluish(img: &DynamicImage, x: u32, y: u32) -> bool {
    let px = img.to_rgb8().get_pixel(x, y).0;
    px[2] as i32 - px[0] as i32 > 64
}
