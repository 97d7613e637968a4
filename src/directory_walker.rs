//! Enumerating a source directory and driving the mover over its files.
//!
//! Only direct children are considered. Entries that are not regular files
//! (directories, symlinks, sockets) are skipped, as is anything the filter
//! set excludes, which by default means names starting with a dot.
//! Files are processed in name order so runs are reproducible.

use crate::config::CompiledFilters;
use crate::file_category::{CategoryTable, extension_of};
use crate::file_organizer::{FileOrganizer, OrganizeError, OrganizeResult};
use crate::report::{OrganizationStats, Reporter};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Snapshot of one candidate file, taken at scan time.
///
/// The file may change or disappear before it is moved; the mover reports
/// that as a failure for this file only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    /// Full path to the file, with the exact on-disk name.
    #[serde(serialize_with = "serialize_lossy")]
    pub path: PathBuf,
    /// Base name of the file for display, lossily decoded if it is not UTF-8.
    pub name: String,
    /// Lowercase extension including the dot, or empty.
    pub extension: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileDescriptor {
    /// Describes the file at `path` by reading its metadata.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let name = path
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?
            .to_string_lossy()
            .into_owned();
        let metadata = fs::metadata(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            extension: extension_of(&name),
            name,
            size: metadata.len(),
        })
    }
}

fn serialize_lossy<S: serde::Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Files found by a scan, plus any errors hit while listing.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Eligible files, sorted by file name.
    pub files: Vec<FileDescriptor>,
    /// Problems hit while enumerating; listing stops at the first failed entry.
    pub errors: Vec<OrganizeError>,
}

/// Checks that `source_dir` exists and is a directory.
pub fn validate_source(source_dir: &Path) -> OrganizeResult<()> {
    let metadata = fs::metadata(source_dir).map_err(|e| OrganizeError::InvalidSource {
        path: source_dir.to_path_buf(),
        reason: if e.kind() == io::ErrorKind::NotFound {
            "directory does not exist".to_string()
        } else {
            e.to_string()
        },
    })?;

    if !metadata.is_dir() {
        return Err(OrganizeError::InvalidSource {
            path: source_dir.to_path_buf(),
            reason: "path is not a directory".to_string(),
        });
    }
    Ok(())
}

/// Organizes `source_dir` with the built-in category table and filters.
///
/// # Examples
///
/// ```no_run
/// use file_organizer::directory_walker::organize;
/// use file_organizer::report::LogReporter;
/// use std::path::Path;
///
/// let stats = organize(Path::new("/home/user/Downloads"), &mut LogReporter)?;
/// println!("Moved {} files", stats.total_moved());
/// # Ok::<(), file_organizer::OrganizeError>(())
/// ```
pub fn organize(source_dir: &Path, reporter: &mut dyn Reporter) -> OrganizeResult<OrganizationStats> {
    let table = CategoryTable::default();
    let filters = CompiledFilters::default();
    DirectoryWalker::new(&table, &filters).organize(source_dir, reporter)
}

/// Walks one directory and moves its eligible files into category folders.
pub struct DirectoryWalker<'a> {
    table: &'a CategoryTable,
    filters: &'a CompiledFilters,
}

impl<'a> DirectoryWalker<'a> {
    pub fn new(table: &'a CategoryTable, filters: &'a CompiledFilters) -> Self {
        Self { table, filters }
    }

    /// Lists the eligible files of `source_dir` without touching anything.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSource` if the path is missing or not a directory and
    /// `ScanFailed` if the directory cannot be opened. Failures on individual
    /// entries are collected in [`ScanOutcome::errors`] instead.
    pub fn scan(&self, source_dir: &Path) -> OrganizeResult<ScanOutcome> {
        validate_source(source_dir)?;

        let entries = fs::read_dir(source_dir).map_err(|e| OrganizeError::ScanFailed {
            path: source_dir.to_path_buf(),
            source: e,
        })?;

        let mut outcome = ScanOutcome::default();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    outcome.errors.push(OrganizeError::ScanFailed {
                        path: source_dir.to_path_buf(),
                        source: e,
                    });
                    break;
                }
            };

            match entry.file_type() {
                Ok(file_type) if file_type.is_file() => {}
                Ok(_) => continue,
                Err(e) => {
                    outcome.errors.push(OrganizeError::ScanFailed {
                        path: entry.path(),
                        source: e,
                    });
                    continue;
                }
            }

            if !self.filters.should_include(Path::new(&entry.file_name())) {
                continue;
            }

            match FileDescriptor::from_path(&entry.path()) {
                Ok(file) => outcome.files.push(file),
                Err(e) => outcome.errors.push(OrganizeError::ScanFailed {
                    path: entry.path(),
                    source: e,
                }),
            }
        }

        outcome
            .files
            .sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(outcome)
    }

    /// Scans `source_dir` and moves every eligible file.
    ///
    /// Only a failed validation or an unreadable source directory aborts the
    /// run. Everything else ends up in the returned statistics.
    pub fn organize(
        &self,
        source_dir: &Path,
        reporter: &mut dyn Reporter,
    ) -> OrganizeResult<OrganizationStats> {
        let outcome = self.scan(source_dir)?;
        Ok(self.organize_scanned(source_dir, outcome, reporter))
    }

    /// Moves the files of an earlier scan, e.g. after the user confirmed a preview.
    pub fn organize_scanned(
        &self,
        source_dir: &Path,
        outcome: ScanOutcome,
        reporter: &mut dyn Reporter,
    ) -> OrganizationStats {
        let mut stats = OrganizationStats::default();
        reporter.run_started(source_dir, outcome.files.len());

        for error in &outcome.errors {
            reporter.scan_error(error);
            stats.record_scan_error(error);
        }

        let organizer = FileOrganizer::new(self.table);
        for file in &outcome.files {
            reporter.file_found(file, self.table.classify(&file.extension));
            stats.record(organizer.move_file(file, source_dir, reporter));
        }

        reporter.run_finished(&stats);
        stats
    }
}
