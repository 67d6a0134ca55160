//! Input discovery.
//!
//! Turns the user's command-line inputs into a flat, ordered list of image
//! paths. Directories are walked recursively and filtered by extension; files
//! named explicitly are taken as-is, whatever their extension, and left for
//! the decoder to accept or reject.
//!
//! ## Extension filter
//!
//! The match is **case-sensitive**: `photo.jpg` is picked up during a walk,
//! `PHOTO.JPG` is not. Recognised extensions are listed in
//! [`IMAGE_EXTENSIONS`].
//!
//! ## Ordering
//!
//! Each walked directory yields its matches in lexicographic path order.
//! Inputs are expanded in the order given, so `a/ b.png c/` produces all of
//! `a/`, then `b.png`, then all of `c/`.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

/// Extensions (without the dot) considered images during a directory walk.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp", "tiff"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Whether `path` carries one of the [`IMAGE_EXTENSIONS`] (case-sensitive).
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e))
}

/// Recursively collect every image file under `root`, sorted.
///
/// Symlinks are not descended into, but a link that resolves to a file is
/// listed like the file itself. Entries that cannot be read below `root`
/// are logged and skipped; only an unreadable `root` is an error.
pub fn list_images(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                warn!(root = %root.display(), "skipping unreadable entry: {err}");
                continue;
            }
        };
        if is_image(entry.path()) && entry.path().is_file() {
            files.push(entry.into_path());
        }
    }
    // Plain string order, not component order: "a.png" sorts before "a/b.png"
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    Ok(files)
}

/// Expand a mix of files and directories into image paths.
///
/// Directories go through [`list_images`]; anything else is kept verbatim,
/// even if it does not exist, so that the pipeline reports it as a failed
/// item instead of the whole batch refusing to start. A directory that
/// cannot be walked is logged and contributes nothing; the other inputs are
/// still expanded. Duplicates are not removed: naming the same file twice
/// compresses it twice, each into its own output name.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    expand_inputs_with(inputs, list_images)
}

/// [`expand_inputs`] with an injectable directory walker.
pub fn expand_inputs_with(
    inputs: &[PathBuf],
    walk: impl Fn(&Path) -> Result<Vec<PathBuf>, ScanError>,
) -> Vec<PathBuf> {
    let mut images = Vec::new();
    for input in inputs {
        if !input.is_dir() {
            images.push(input.clone());
            continue;
        }
        match walk(input) {
            Ok(found) => images.extend(found),
            Err(err) => warn!(dir = %input.display(), "skipping directory: {err}"),
        }
    }
    images
}
