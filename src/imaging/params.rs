//! Parameter types for encoding.
//!
//! These types describe *what* the encoder should aim for, not *how* it gets
//! there. They are shared between the [`search`](super::search) module (which
//! decides which qualities to try) and the [`backend`](super::backend) (which
//! does the actual JPEG work).
//!
//! ## Types
//!
//! - [`Quality`]: JPEG quality (1–100, default 85). Clamped on construction.
//! - [`QualityRange`]: Closed interval searched in target-size mode (default 10–95).
//! - [`SizeTarget`]: Either a byte budget or "disabled" (fixed quality).

use serde::Serialize;

/// Quality used when no size target is set.
pub const DEFAULT_QUALITY: u8 = 85;

/// Lower end of the target-size search, also the fallback quality.
pub const MIN_SEARCH_QUALITY: u8 = 10;

/// Upper end of the target-size search.
pub const MAX_SEARCH_QUALITY: u8 = 95;

/// Quality setting for lossy JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(DEFAULT_QUALITY)
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive quality interval for the binary search.
///
/// `min` doubles as the fallback quality when no value in the range fits
/// the size target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityRange {
    pub min: Quality,
    pub max: Quality,
}

impl QualityRange {
    /// Build a range, swapping the ends if they arrive reversed.
    pub fn new(min: u8, max: u8) -> Self {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min: Quality::new(lo),
            max: Quality::new(hi),
        }
    }
}

impl Default for QualityRange {
    fn default() -> Self {
        Self::new(MIN_SEARCH_QUALITY, MAX_SEARCH_QUALITY)
    }
}

/// What the encoder should aim for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTarget {
    /// Encode once at a fixed quality.
    Disabled,
    /// Highest quality whose output fits in this many bytes.
    Bytes(u64),
}

impl SizeTarget {
    /// Interpret a user-facing kilobyte value: anything `<= 0` disables the search.
    pub fn from_kilobytes(kb: i64) -> Self {
        if kb <= 0 {
            Self::Disabled
        } else {
            Self::Bytes((kb as u64).saturating_mul(1024))
        }
    }
}
