//! # jpegfit
//!
//! Compress a batch of images to JPEG, each under a byte budget and inside an
//! optional bounding box, without ever overwriting an existing file.
//!
//! # Architecture: One Linear Pipeline Per Image
//!
//! ```text
//! path ─▶ orientation ─▶ upright pixels ─▶ bounded pixels ─▶ JPEG bytes + quality
//!                                                                   │
//!                                      unique output path ◀─────────┘ ─▶ staged write
//! ```
//!
//! Each stage is a plain function of its inputs. No global state: the target
//! size, bounds and destination travel with every [`process::CompressRequest`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Decode, EXIF orientation, fit resize, size-targeted JPEG encoding |
//! | [`naming`] | `{stem}.jpg` output names and `{stem} (n).jpg` disambiguation |
//! | [`scan`] | Recursive, sorted, extension-filtered input discovery |
//! | [`process`] | Per-image pipeline, staged no-clobber writes, batch loop |
//! | [`config`] | `jpegfit.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting and the JSON report |
//!
//! # Design Decisions
//!
//! ## Binary Search Over Quality
//!
//! JPEG size grows with quality, roughly monotonically. A binary search over
//! [10, 95] finds the highest quality that fits in at most seven encodes. When
//! even quality 10 is too big the result is still written, at quality 10,
//! and flagged as over target instead of failing the item.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling (Lanczos3) and JPEG encoding all come from the `image`
//! crate; EXIF parsing comes from `kamadak-exif`. No system libraries.
//!
//! ## Failures Stay Local
//!
//! A batch never aborts: every request yields one outcome, and a failed item
//! leaves nothing behind in the destination directory.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
