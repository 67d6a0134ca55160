//! High-level image operations.
//!
//! These functions combine the pure dimension math from
//! [`calculations`](super::calculations) with pixel work on a
//! [`DynamicImage`].

use super::backend::ImagingError;
use super::calculations::calculate_fit_dimensions;
use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

/// Largest width or height a bound can ask for; JPEG cannot encode more.
pub const MAX_BOUND: u32 = 65_535;

/// Upscaling is refused when the result would exceed this many pixels.
pub const MAX_UPSCALE_PIXELS: u64 = 100_000_000;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Options for [`resize_to_fit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeOptions {
    /// Enlarge images smaller than the box until they touch it.
    pub allow_upscale: bool,
}

/// Scale `image` to fit inside `max_width` x `max_height`, preserving aspect
/// ratio (Lanczos3).
///
/// - Both bounds zero: `image` is returned as-is, no copy.
/// - One bound zero: that axis is unconstrained.
/// - Any negative bound: [`ImagingError::InvalidArgument`].
/// - Bounds above [`MAX_BOUND`] are clamped to it.
/// - Enlarging past [`MAX_UPSCALE_PIXELS`]: [`ImagingError::InvalidArgument`].
pub fn resize_to_fit(
    image: DynamicImage,
    max_width: i64,
    max_height: i64,
    options: ResizeOptions,
) -> Result<DynamicImage> {
    if max_width < 0 || max_height < 0 {
        return Err(ImagingError::InvalidArgument(format!(
            "dimension bounds must be non-negative, got {max_width}x{max_height}"
        )));
    }
    if max_width == 0 && max_height == 0 {
        return Ok(image);
    }

    let bounds = (clamp_bound(max_width), clamp_bound(max_height));
    let source = (image.width(), image.height());
    let (width, height) = calculate_fit_dimensions(source, bounds, options.allow_upscale);

    if (width, height) == source {
        debug!(width, height, "already fits, skipping resize");
        return Ok(image);
    }
    let enlarging = width > source.0 || height > source.1;
    if enlarging && u64::from(width) * u64::from(height) > MAX_UPSCALE_PIXELS {
        return Err(ImagingError::InvalidArgument(format!(
            "upscaling {}x{} to {width}x{height} exceeds {MAX_UPSCALE_PIXELS} pixels",
            source.0, source.1
        )));
    }
    debug!(from = ?source, to = ?(width, height), "resizing");
    Ok(image.resize_exact(width, height, FilterType::Lanczos3))
}

fn clamp_bound(bound: i64) -> u32 {
    u32::try_from(bound).unwrap_or(u32::MAX).min(MAX_BOUND)
}
