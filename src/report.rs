//! Reporting of organization runs.
//!
//! The engine never writes to a global sink on its own. It calls a
//! [`Reporter`] handed in by the caller, which decides where events go:
//! [`LogReporter`] forwards them to the `log` facade, the console shell wraps
//! it with colored output, and tests record them in memory.

use crate::directory_walker::FileDescriptor;
use crate::file_category::OTHERS;
use crate::file_organizer::{MoveFailure, MoveResult, MovedFile, OrganizeError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// How many error messages a summary lists before collapsing the rest.
pub const MAX_LISTED_ERRORS: usize = 10;

/// Receives progress events from the directory walker and the mover.
///
/// Every method has an empty default so implementors only pick the events
/// they care about.
pub trait Reporter {
    /// A run over `source` is about to process `total` files.
    fn run_started(&mut self, _source: &Path, _total: usize) {}

    /// `file` is about to be moved; `category` is its classifier result.
    fn file_found(&mut self, _file: &FileDescriptor, _category: &str) {}

    fn file_moved(&mut self, _moved: &MovedFile) {}

    fn move_failed(&mut self, _failure: &MoveFailure) {}

    /// Listing the source directory hit a problem.
    fn scan_error(&mut self, _error: &OrganizeError) {}

    fn run_finished(&mut self, _stats: &OrganizationStats) {}
}

/// Forwards events to the `log` facade: info for progress, error for
/// failed moves, warn for scan problems.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn run_started(&mut self, source: &Path, total: usize) {
        log::info!("Organizing files in: {}", source.display());
        log::info!("{} files to organize", total);
    }

    fn file_found(&mut self, file: &FileDescriptor, category: &str) {
        if file.extension.is_empty() {
            log::info!("No extension for file: {}", file.name);
        } else if category == OTHERS {
            log::info!(
                "Found file: {}, extension: {}, uncategorized",
                file.name,
                file.extension
            );
        } else {
            log::info!(
                "Found file: {}, extension: {}, category: {}",
                file.name,
                file.extension,
                category
            );
        }
    }

    fn file_moved(&mut self, moved: &MovedFile) {
        if moved.was_renamed() {
            log::info!(
                "Moved file: {} to {}, renamed to {}",
                moved.file_name,
                moved.folder,
                moved.final_name
            );
        } else {
            log::info!("Moved file: {} to {}", moved.file_name, moved.folder);
        }
    }

    fn move_failed(&mut self, failure: &MoveFailure) {
        log::error!("{}", failure);
    }

    fn scan_error(&mut self, error: &OrganizeError) {
        log::warn!("{}", error);
    }

    fn run_finished(&mut self, stats: &OrganizationStats) {
        if stats.total_moved() > 0 {
            log::info!(
                "Moved {} files to their respective folders.",
                stats.total_moved()
            );
        } else {
            log::info!("No files were moved.");
        }
        if stats.failed() > 0 {
            log::warn!("{} files could not be organized", stats.failed());
        }
    }
}

/// Keeps every event in memory.
#[doc(hidden)]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    /// File count announced at the start of the run.
    pub started: Option<usize>,
    /// Names of files in the order they were found.
    pub found: Vec<String>,
    pub moved: Vec<MovedFile>,
    /// Rendered failure messages.
    pub failures: Vec<String>,
    pub scan_errors: Vec<String>,
    pub finished: bool,
}

impl Reporter for RecordingReporter {
    fn run_started(&mut self, _source: &Path, total: usize) {
        self.started = Some(total);
    }

    fn file_found(&mut self, file: &FileDescriptor, _category: &str) {
        self.found.push(file.name.clone());
    }

    fn file_moved(&mut self, moved: &MovedFile) {
        self.moved.push(moved.clone());
    }

    fn move_failed(&mut self, failure: &MoveFailure) {
        self.failures.push(failure.to_string());
    }

    fn scan_error(&mut self, error: &OrganizeError) {
        self.scan_errors.push(error.to_string());
    }

    fn run_finished(&mut self, _stats: &OrganizationStats) {
        self.finished = true;
    }
}

/// Per-folder success counts and error messages of one run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationStats {
    moved: BTreeMap<String, usize>,
    failed: usize,
    errors: Vec<String>,
}

impl OrganizationStats {
    /// Folds one move outcome into the totals.
    pub fn record(&mut self, result: MoveResult) {
        match result {
            Ok(moved) => self.record_success(&moved.folder),
            Err(failure) => self.record_failure(&failure),
        }
    }

    pub fn record_success(&mut self, folder: &str) {
        *self.moved.entry(folder.to_string()).or_insert(0) += 1;
    }

    pub fn record_failure(&mut self, failure: &MoveFailure) {
        self.failed += 1;
        self.errors.push(failure.to_string());
    }

    /// Scan problems are listed with the errors but are not failed files.
    pub fn record_scan_error(&mut self, error: &OrganizeError) {
        self.errors.push(error.to_string());
    }

    /// Number of files moved into `folder`.
    pub fn moved_to(&self, folder: &str) -> usize {
        self.moved.get(folder).copied().unwrap_or(0)
    }

    /// Success counts keyed by folder name, in name order.
    pub fn per_folder(&self) -> &BTreeMap<String, usize> {
        &self.moved
    }

    pub fn total_moved(&self) -> usize {
        self.moved.values().sum()
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Files for which a move was attempted.
    pub fn attempted(&self) -> usize {
        self.total_moved() + self.failed
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// True if nothing went wrong during the run.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Renders a plain-text summary listing at most `max_errors` errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use file_organizer::report::OrganizationStats;
    ///
    /// let mut stats = OrganizationStats::default();
    /// stats.record_success("Documents");
    /// let text = stats.summary(10);
    /// assert!(text.contains("Successfully organized: 1"));
    /// assert!(text.contains("  Documents: 1 file"));
    /// ```
    pub fn summary(&self, max_errors: usize) -> String {
        let mut out = String::new();

        if self.attempted() == 0 && self.errors.is_empty() {
            out.push_str("No files were moved.\n");
            return out;
        }

        let _ = writeln!(out, "Total files processed: {}", self.attempted());
        let _ = writeln!(out, "Successfully organized: {}", self.total_moved());
        let _ = writeln!(out, "Failed: {}", self.failed);

        if !self.moved.is_empty() {
            out.push_str("\nFiles organized by folder:\n");
            for (folder, count) in &self.moved {
                let _ = writeln!(out, "  {}: {} {}", folder, count, plural(*count));
            }
        }

        if !self.errors.is_empty() {
            let _ = writeln!(out, "\nErrors ({}):", self.errors.len());
            for error in self.errors.iter().take(max_errors) {
                let _ = writeln!(out, "  {}", error);
            }
            if self.errors.len() > max_errors {
                let _ = writeln!(
                    out,
                    "  ... and {} more errors",
                    self.errors.len() - max_errors
                );
            }
        }

        out
    }
}

/// "file" or "files" for a count.
pub fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

/// Machine-readable record of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub source: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub attempted: usize,
    pub moved: usize,
    pub failed: usize,
    pub stats: OrganizationStats,
}

impl RunReport {
    pub fn new(source: &Path, started_at: DateTime<Utc>, stats: OrganizationStats) -> Self {
        Self {
            source: source.to_path_buf(),
            started_at,
            finished_at: Utc::now(),
            attempted: stats.attempted(),
            moved: stats.total_moved(),
            failed: stats.failed(),
            stats,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
