//! Image processing: decode, orient, fit, encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (content-sniffed) |
//! | **Orientation** | `kamadak-exif`, then `DynamicImage::rotate*` |
//! | **Fit resize** | Lanczos3 via `DynamicImage::resize_exact` |
//! | **Encode** | `image::codecs::jpeg::JpegEncoder` |
//! | **Size target** | binary search over JPEG quality |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Quality, quality range, size target
//! - **Backend**: [`JpegEncode`] trait + [`RustBackend`]
//! - **Loader / Orientation**: file → upright [`image::DynamicImage`]
//! - **Operations**: resize-to-fit
//! - **Search**: size-targeted encoding on top of any [`JpegEncode`]

pub mod backend;
mod calculations;
pub mod loader;
pub mod operations;
pub mod orientation;
mod params;
pub mod rust_backend;
pub mod search;

pub use backend::{ImagingError, JpegEncode};
pub use calculations::calculate_fit_dimensions;
pub use loader::load_image;
pub use operations::{ResizeOptions, resize_to_fit};
pub use orientation::{Orientation, read_orientation};
pub use params::{
    DEFAULT_QUALITY, MAX_SEARCH_QUALITY, MIN_SEARCH_QUALITY, Quality, QualityRange, SizeTarget,
};
pub use rust_backend::RustBackend;
pub use search::{EncodedImage, encode_to_target};
