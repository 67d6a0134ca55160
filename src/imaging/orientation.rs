//! EXIF orientation: reading the tag and applying the correction.
//!
//! The tag is read straight from the file container with `kamadak-exif`,
//! independent of pixel decoding. Missing or unreadable metadata is the common
//! case (PNGs, screenshots, stripped exports), so every failure degrades to
//! [`Orientation::Normal`] instead of an error.
//!
//! Only the pure rotations are corrected:
//!
//! | Code | Meaning | Correction |
//! |---|---|---|
//! | 1 | normal | none |
//! | 3 | upside down | rotate 180° |
//! | 6 | sensor rotated 90° CCW | rotate 90° clockwise |
//! | 8 | sensor rotated 90° CW | rotate 270° clockwise |
//!
//! The mirrored variants (2, 4, 5, 7) are recognised but passed through
//! unmodified. They almost never come out of real cameras.

use image::DynamicImage;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// The eight standard EXIF orientation values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Normal,
    MirrorHorizontal,
    Rotate180,
    MirrorVertical,
    MirrorHorizontalRotate270Cw,
    Rotate90Cw,
    MirrorHorizontalRotate90Cw,
    Rotate270Cw,
}

impl Orientation {
    /// Map a raw tag value. Anything outside 1..=8 is `None`.
    pub fn from_exif(value: u32) -> Option<Self> {
        Some(match value {
            1 => Self::Normal,
            2 => Self::MirrorHorizontal,
            3 => Self::Rotate180,
            4 => Self::MirrorVertical,
            5 => Self::MirrorHorizontalRotate270Cw,
            6 => Self::Rotate90Cw,
            7 => Self::MirrorHorizontalRotate90Cw,
            8 => Self::Rotate270Cw,
            _ => return None,
        })
    }

    pub fn exif_value(self) -> u16 {
        match self {
            Self::Normal => 1,
            Self::MirrorHorizontal => 2,
            Self::Rotate180 => 3,
            Self::MirrorVertical => 4,
            Self::MirrorHorizontalRotate270Cw => 5,
            Self::Rotate90Cw => 6,
            Self::MirrorHorizontalRotate90Cw => 7,
            Self::Rotate270Cw => 8,
        }
    }

    /// Rotate `image` upright. Non-rotation codes return it untouched.
    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Self::Rotate180 => image.rotate180(),
            Self::Rotate90Cw => image.rotate90(),
            Self::Rotate270Cw => image.rotate270(),
            _ => image,
        }
    }
}

/// Read the orientation tag of the file at `path`.
///
/// Returns [`Orientation::Normal`] on any failure.
pub fn read_orientation(path: &Path) -> Orientation {
    let Some(value) = read_orientation_value(path) else {
        return Orientation::Normal;
    };
    match Orientation::from_exif(value) {
        Some(orientation) => {
            debug!(path = %path.display(), code = value, "exif orientation");
            orientation
        }
        None => {
            debug!(path = %path.display(), code = value, "ignoring out-of-range orientation");
            Orientation::Normal
        }
    }
}

fn read_orientation_value(path: &Path) -> Option<u32> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
    let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
    field.value.get_uint(0)
}
