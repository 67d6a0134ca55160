//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Each item is shown by its position in the batch and its source, with the
//! result as the rest of the line. Paths are printed as given so the output
//! can be matched against the command line.
//!
//! ```text
//! 001 holiday/beach.png → out/beach.jpg (q=72, 48.9 KB, 1000x750)
//! 002 holiday/dunes.jpg → out/dunes.jpg (q=10, 61.2 KB, 1000x667) over target
//! 003 holiday/broken.jpg failed: Decode error: ...
//! 004 scans/receipt.bmp → out/receipt.jpg (fixed, 12.0 KB, 800x1200)
//!
//! Compressed 3 of 4 images, 1 failed, 122.1 KB written
//! ```
//!
//! # Architecture
//!
//! Every display has a `format_*` function (pure, returns `String` or
//! `Vec<String>`) and, where the CLI needs it, a `print_*` wrapper that writes
//! to stdout. The `--report` file is built here too, from [`report_entries`].

use crate::process::{BatchReport, CompressOutcome, ProcessEvent};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Format a byte count in KB with one decimal.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// One line for a finished item. `index` is 0-based.
pub fn format_outcome(index: usize, outcome: &CompressOutcome) -> String {
    match outcome {
        Ok(done) => {
            let quality = match done.quality {
                Some(q) => format!("q={q}"),
                None => "fixed".to_string(),
            };
            let mut line = format!(
                "{} {} → {} ({}, {}, {}x{})",
                format_index(index + 1),
                done.source.display(),
                done.output.display(),
                quality,
                format_kb(done.bytes_written),
                done.width,
                done.height
            );
            if !done.fits_target {
                line.push_str(" over target");
            }
            line
        }
        Err(failure) => format!(
            "{} {} failed: {}",
            format_index(index + 1),
            failure.source.display(),
            failure.error
        ),
    }
}

/// Lines for a progress event: nothing on start, the outcome on finish.
pub fn format_event(event: &ProcessEvent<'_>) -> Vec<String> {
    match event {
        ProcessEvent::Started { .. } => Vec::new(),
        ProcessEvent::Finished { index, outcome, .. } => vec![format_outcome(*index, outcome)],
    }
}

pub fn print_event(event: &ProcessEvent<'_>) {
    for line in format_event(event) {
        println!("{}", line);
    }
}

/// Closing line of a batch.
pub fn format_summary(report: &BatchReport) -> String {
    let total = report.outcomes.len();
    let failed = report.failure_count();
    let ok = total - failed;
    let noun = if total == 1 { "image" } else { "images" };
    let mut line = format!("Compressed {ok} of {total} {noun}");
    if failed > 0 {
        line.push_str(&format!(", {failed} failed"));
    }
    line.push_str(&format!(", {} written", format_kb(report.bytes_written())));
    line
}

pub fn print_summary(report: &BatchReport) {
    println!();
    println!("{}", format_summary(report));
}

/// The `list` command: one indexed line per image, relative to `root` when
/// possible.
pub fn format_listing(root: &Path, images: &[PathBuf]) -> Vec<String> {
    if images.is_empty() {
        return vec![format!("No images under {}", root.display())];
    }
    images
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let shown = path.strip_prefix(root).unwrap_or(path);
            format!("{} {}", format_index(i + 1), shown.display())
        })
        .collect()
}

pub fn print_listing(root: &Path, images: &[PathBuf]) {
    for line in format_listing(root, images) {
        println!("{}", line);
    }
}

// ============================================================================
// JSON report
// ============================================================================

/// One entry of the `--report` file.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportEntry {
    Ok {
        source: PathBuf,
        output: PathBuf,
        bytes: u64,
        /// Absent in fixed-quality mode.
        #[serde(skip_serializing_if = "Option::is_none")]
        quality: Option<u8>,
        width: u32,
        height: u32,
        fits_target: bool,
    },
    Failed {
        source: PathBuf,
        kind: String,
        error: String,
    },
}

/// Report entries in batch order.
pub fn report_entries(report: &BatchReport) -> Vec<ReportEntry> {
    report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            Ok(done) => ReportEntry::Ok {
                source: done.source.clone(),
                output: done.output.clone(),
                bytes: done.bytes_written,
                quality: done.quality.map(|q| q.value()),
                width: done.width,
                height: done.height,
                fits_target: done.fits_target,
            },
            Err(failure) => ReportEntry::Failed {
                source: failure.source.clone(),
                kind: failure.error.kind().to_string(),
                error: failure.error.to_string(),
            },
        })
        .collect()
}
