//! Size-targeted encoding.
//!
//! Two modes, picked by [`SizeTarget`]:
//!
//! - **Fixed quality** ([`SizeTarget::Disabled`]): one encode at the default
//!   quality, no search.
//! - **Target size** ([`SizeTarget::Bytes`]): binary search over a
//!   [`QualityRange`] for the highest quality whose output fits the budget.
//!
//! ## Why binary search works
//!
//! For a fixed image, JPEG output size is monotonically non-decreasing in
//! quality. The set of feasible qualities is therefore a prefix of the range,
//! and the best answer is its last element. Every iteration halves the open
//! interval, so the default 10–95 range costs at most 7 encodes.
//!
//! When even the minimum quality is over budget, the search re-encodes at the
//! minimum and returns that anyway. The caller always gets output; only the
//! `fits` flag on [`EncodedImage`] tells it the budget was missed.

use super::backend::{ImagingError, JpegEncode};
use super::params::{Quality, QualityRange, SizeTarget};
use image::DynamicImage;
use tracing::debug;

/// An encoded buffer and how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub quality: Quality,
    /// Whether a quality search ran (false in fixed-quality mode).
    pub searched: bool,
    /// Whether the output respects the target. Always true without a target.
    pub fits: bool,
    /// Number of encoder invocations, fallback included.
    pub attempts: u32,
}

/// Encode `image` according to `target`.
///
/// `fixed_quality` is used when the target is disabled; `range` bounds the
/// search otherwise. An encoder error aborts immediately, without trying any
/// other quality.
pub fn encode_to_target(
    encoder: &impl JpegEncode,
    image: &DynamicImage,
    target: SizeTarget,
    fixed_quality: Quality,
    range: QualityRange,
) -> Result<EncodedImage, ImagingError> {
    match target {
        SizeTarget::Disabled => {
            let bytes = encoder.encode(image, fixed_quality)?;
            Ok(EncodedImage {
                bytes,
                quality: fixed_quality,
                searched: false,
                fits: true,
                attempts: 1,
            })
        }
        SizeTarget::Bytes(limit) => search_quality(encoder, image, limit, range),
    }
}

/// Binary search for the highest quality in `range` whose output is at most
/// `limit` bytes.
fn search_quality(
    encoder: &impl JpegEncode,
    image: &DynamicImage,
    limit: u64,
    range: QualityRange,
) -> Result<EncodedImage, ImagingError> {
    // i16 so that `mid - 1` below the floor cannot underflow
    let mut lo = range.min.value() as i16;
    let mut hi = range.max.value() as i16;
    let mut best: Option<(Vec<u8>, Quality)> = None;
    let mut attempts = 0;

    while lo <= hi {
        let mid = (lo + hi) / 2;
        let quality = Quality::new(mid as u8);
        let bytes = encoder.encode(image, quality)?;
        attempts += 1;

        let size = bytes.len() as u64;
        let fits = size <= limit;
        debug!(quality = mid, size, limit, fits, "quality attempt");

        if fits {
            // mid only grows while lo rises, so a later fit always beats this one
            best = Some((bytes, quality));
            lo = mid + 1;
        } else {
            hi = mid - 1;
        }
    }

    match best {
        Some((bytes, quality)) => Ok(EncodedImage {
            bytes,
            quality,
            searched: true,
            fits: true,
            attempts,
        }),
        None => {
            let bytes = encoder.encode(image, range.min)?;
            debug!(
                quality = range.min.value(),
                size = bytes.len(),
                limit,
                "target unreachable, keeping minimum quality"
            );
            Ok(EncodedImage {
                fits: bytes.len() as u64 <= limit,
                bytes,
                quality: range.min,
                searched: true,
                attempts: attempts + 1,
            })
        }
    }
}
