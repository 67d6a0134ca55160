//! Decoding source files into upright pixel buffers.

use super::backend::ImagingError;
use super::orientation::read_orientation;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Decode the image at `path` and rotate it upright from its EXIF tag.
///
/// The format is sniffed from the file content, with the extension as a
/// fallback. Orientation is read in a second, independent pass; if that pass
/// finds nothing usable the decoded image is returned as-is.
pub fn load_image(path: &Path) -> Result<DynamicImage, ImagingError> {
    let image = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| ImagingError::Decode(format!("{}: {}", path.display(), e)))?;
    Ok(read_orientation(path).apply(image))
}
