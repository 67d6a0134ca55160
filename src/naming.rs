//! Output file naming and collision avoidance.
//!
//! Every source image becomes `{stem}.jpg` in the destination directory,
//! regardless of its input format. Existing files are never overwritten:
//! if the name is taken, a counter is appended before the extension.
//!
//! ```text
//! photo.jpg        ← free, used as-is
//! photo (1).jpg    ← photo.jpg existed
//! photo (2).jpg    ← both of the above existed
//! ```
//!
//! The existence check and the later write are separate steps, so this alone
//! does not protect against a concurrent writer. The final write in
//! [`process`](crate::process) persists with no-clobber semantics and
//! re-resolves if it loses that race.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension of every output file.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// Give up after this many numbered candidates.
pub const MAX_DISAMBIGUATION_ATTEMPTS: u32 = 10_000;

#[derive(Error, Debug)]
pub enum NamingError {
    #[error("no free name for {path} after {attempts} attempts")]
    Exhausted { path: PathBuf, attempts: u32 },
}

/// Output file name for a source image: its stem with a `.jpg` extension.
///
/// - `"IMG_0042.png"` → `"IMG_0042.jpg"`
/// - `"archive.tar.png"` → `"archive.tar.jpg"`
/// - `".hidden"` → `".hidden.jpg"`
pub fn output_file_name(source: &Path) -> OsString {
    let mut name = source
        .file_stem()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("image"));
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    name
}

/// Return `candidate` if nothing exists there, otherwise the first free
/// `"{stem} ({n}){ext}"` sibling, counting from 1.
pub fn unique_output_path(candidate: &Path) -> Result<PathBuf, NamingError> {
    unique_output_path_with(candidate, |p| p.exists())
}

/// [`unique_output_path`] with an injectable existence check.
pub fn unique_output_path_with(
    candidate: &Path,
    exists: impl Fn(&Path) -> bool,
) -> Result<PathBuf, NamingError> {
    if !exists(candidate) {
        return Ok(candidate.to_path_buf());
    }

    let dir = candidate.parent().unwrap_or_else(|| Path::new(""));
    let stem = candidate.file_stem().unwrap_or_default();
    let ext = candidate.extension();

    for counter in 1..=MAX_DISAMBIGUATION_ATTEMPTS {
        let mut name = stem.to_os_string();
        name.push(format!(" ({counter})"));
        if let Some(ext) = ext {
            name.push(".");
            name.push(ext);
        }
        let path = dir.join(name);
        if !exists(&path) {
            return Ok(path);
        }
    }

    Err(NamingError::Exhausted {
        path: candidate.to_path_buf(),
        attempts: MAX_DISAMBIGUATION_ATTEMPTS,
    })
}
