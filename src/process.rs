//! The compression pipeline and the batch loop around it.
//!
//! One [`CompressRequest`] goes through five steps, each finishing before the
//! next starts:
//!
//! ```text
//! source ──load──▶ upright pixels ──fit──▶ bounded pixels ──encode──▶ JPEG bytes
//!                                                                        │
//!                          destination/{stem}.jpg or {stem} (n).jpg ◀────┘
//! ```
//!
//! ## Failure isolation
//!
//! Every request yields exactly one [`CompressOutcome`]. A failing item never
//! stops the batch; [`compress_batch`] records the failure and moves on.
//!
//! ## No partial output
//!
//! Encoded bytes are staged in a temporary file inside the destination
//! directory and only moved to their final name once completely written,
//! with no-clobber semantics. On any failure the staging file is removed, so
//! the destination never holds a truncated JPEG.
//!
//! ## Sequential by construction
//!
//! Items run strictly one at a time in request order, on the caller's thread.
//! Progress is reported through a plain callback between items.

use crate::config::Config;
use crate::imaging::{
    ImagingError, JpegEncode, Quality, QualityRange, ResizeOptions, RustBackend, SizeTarget,
    encode_to_target, load_image, resize_to_fit,
};
use crate::naming::{NamingError, output_file_name, unique_output_path};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

/// How many times the final write re-resolves its name after losing a race
/// against another writer.
const MAX_WRITE_RACES: u32 = 8;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Encode error: {0}")]
    Encode(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CompressError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
            Self::InvalidArgument(_) => "invalid_argument",
        }
    }
}

impl From<ImagingError> for CompressError {
    fn from(err: ImagingError) -> Self {
        match err {
            ImagingError::Io(e) => Self::Io(e),
            ImagingError::Decode(msg) => Self::Decode(msg),
            ImagingError::Encode(msg) => Self::Encode(msg),
            ImagingError::InvalidArgument(msg) => Self::InvalidArgument(msg),
        }
    }
}

impl From<NamingError> for CompressError {
    fn from(err: NamingError) -> Self {
        Self::Io(std::io::Error::other(err))
    }
}

/// One image to compress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressRequest {
    pub source: PathBuf,
    /// Directory the output lands in. Created (with parents) if missing.
    pub destination: PathBuf,
    /// Size budget in KB. `<= 0` encodes once at the fixed quality.
    pub target_kb: i64,
    /// Bounding box width, `0` = unbounded. Negative is rejected.
    pub max_width: i64,
    /// Bounding box height, `0` = unbounded. Negative is rejected.
    pub max_height: i64,
}

impl CompressRequest {
    /// Reject negative bounds before any pixel work happens.
    pub fn validate(&self) -> Result<(), CompressError> {
        if self.max_width < 0 || self.max_height < 0 {
            return Err(CompressError::InvalidArgument(format!(
                "dimension bounds must be non-negative, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        Ok(())
    }
}

/// Build one request per source, all sharing the same destination and limits.
pub fn build_requests(
    sources: &[PathBuf],
    destination: &Path,
    target_kb: i64,
    max_width: i64,
    max_height: i64,
) -> Vec<CompressRequest> {
    sources
        .iter()
        .map(|source| CompressRequest {
            source: source.clone(),
            destination: destination.to_path_buf(),
            target_kb,
            max_width,
            max_height,
        })
        .collect()
}

/// Encoder tuning shared by every request of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOptions {
    /// Quality used when the request has no size target.
    pub quality: Quality,
    /// Range searched when it does.
    pub range: QualityRange,
    pub resize: ResizeOptions,
}

impl CompressOptions {
    pub fn from_config(config: &Config) -> Self {
        let c = &config.compression;
        Self {
            quality: Quality::new(c.quality),
            range: QualityRange::new(c.min_quality, c.max_quality),
            resize: ResizeOptions {
                allow_upscale: config.resize.upscale,
            },
        }
    }
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// A successfully written output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compressed {
    pub source: PathBuf,
    pub output: PathBuf,
    pub bytes_written: u64,
    /// Quality chosen by the size search; `None` in fixed-quality mode.
    pub quality: Option<Quality>,
    /// Output dimensions after orientation and resize.
    pub width: u32,
    pub height: u32,
    /// False when the target was unreachable and the minimum quality was kept.
    pub fits_target: bool,
}

/// A request that produced no output.
#[derive(Debug)]
pub struct CompressFailure {
    pub source: PathBuf,
    pub error: CompressError,
}

pub type CompressOutcome = Result<Compressed, CompressFailure>;

/// Compress one image with the pure Rust JPEG encoder.
pub fn compress(request: &CompressRequest, options: &CompressOptions) -> CompressOutcome {
    compress_with_encoder(&RustBackend::new(), request, options)
}

/// Compress one image with a specific encoder (allows testing with a mock).
pub fn compress_with_encoder(
    encoder: &impl JpegEncode,
    request: &CompressRequest,
    options: &CompressOptions,
) -> CompressOutcome {
    run_pipeline(encoder, request, options).map_err(|error| {
        warn!(source = %request.source.display(), kind = error.kind(), "{error}");
        CompressFailure {
            source: request.source.clone(),
            error,
        }
    })
}

fn run_pipeline(
    encoder: &impl JpegEncode,
    request: &CompressRequest,
    options: &CompressOptions,
) -> Result<Compressed, CompressError> {
    request.validate()?;

    let image = load_image(&request.source)?;
    let image = resize_to_fit(image, request.max_width, request.max_height, options.resize)?;
    let (width, height) = (image.width(), image.height());

    let target = SizeTarget::from_kilobytes(request.target_kb);
    let encoded = encode_to_target(encoder, &image, target, options.quality, options.range)?;
    drop(image);
    debug!(
        source = %request.source.display(),
        quality = encoded.quality.value(),
        size = encoded.bytes.len(),
        attempts = encoded.attempts,
        "encoded"
    );

    std::fs::create_dir_all(&request.destination)?;
    let candidate = request.destination.join(output_file_name(&request.source));
    let output = write_no_clobber(&candidate, &encoded.bytes)?;

    Ok(Compressed {
        source: request.source.clone(),
        output,
        bytes_written: encoded.bytes.len() as u64,
        quality: encoded.searched.then_some(encoded.quality),
        width,
        height,
        fits_target: encoded.fits,
    })
}

/// Write `bytes` to the first free name derived from `candidate`.
///
/// The data is fully written to a staging file next to the target before it
/// gets a real name; the staging file is deleted if anything fails.
fn write_no_clobber(candidate: &Path, bytes: &[u8]) -> Result<PathBuf, CompressError> {
    let dir = candidate.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)?;
    staged.write_all(bytes)?;
    staged.as_file().sync_all()?;

    for _ in 0..MAX_WRITE_RACES {
        let path = unique_output_path(candidate)?;
        match staged.persist_noclobber(&path) {
            Ok(_) => return Ok(path),
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "name taken while writing, retrying");
                staged = e.file;
            }
            Err(e) => return Err(e.error.into()),
        }
    }
    Err(CompressError::Io(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        format!("{} kept being taken by another writer", candidate.display()),
    )))
}

// =============================================================================
// Batch
// =============================================================================

/// Progress notifications from [`compress_batch`].
#[derive(Debug)]
pub enum ProcessEvent<'a> {
    /// About to start item `index` (0-based) of `total`.
    Started {
        index: usize,
        total: usize,
        source: &'a Path,
    },
    /// Item `index` finished, successfully or not.
    Finished {
        index: usize,
        total: usize,
        outcome: &'a CompressOutcome,
    },
}

/// Outcomes of a batch, in request order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<CompressOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &Compressed> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &CompressFailure> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    pub fn bytes_written(&self) -> u64 {
        self.succeeded().map(|c| c.bytes_written).sum()
    }
}

/// Compress every request in order with the pure Rust encoder.
pub fn compress_batch(
    requests: &[CompressRequest],
    options: &CompressOptions,
    on_event: impl FnMut(ProcessEvent<'_>),
) -> BatchReport {
    compress_batch_with_encoder(&RustBackend::new(), requests, options, on_event)
}

/// Compress every request in order with a specific encoder.
pub fn compress_batch_with_encoder(
    encoder: &impl JpegEncode,
    requests: &[CompressRequest],
    options: &CompressOptions,
    mut on_event: impl FnMut(ProcessEvent<'_>),
) -> BatchReport {
    let total = requests.len();
    let mut outcomes = Vec::with_capacity(total);

    for (index, request) in requests.iter().enumerate() {
        on_event(ProcessEvent::Started {
            index,
            total,
            source: &request.source,
        });
        let outcome = compress_with_encoder(encoder, request, options);
        on_event(ProcessEvent::Finished {
            index,
            total,
            outcome: &outcome,
        });
        outcomes.push(outcome);
    }

    BatchReport { outcomes }
}
