//! Moving files into their destination folders.
//!
//! This module provides the collision-safe namer, idempotent creation of
//! destination folders and the mover that relocates a single file. Failures
//! never escape the mover: they come back as a [`MoveFailure`] value so the
//! caller can keep going with the remaining files.

use crate::directory_walker::FileDescriptor;
use crate::file_category::CategoryTable;
use crate::report::Reporter;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors that can occur while organizing a directory.
#[derive(Debug)]
pub enum OrganizeError {
    /// The source path is missing or is not a directory.
    InvalidSource { path: PathBuf, reason: String },
    /// A destination folder could not be created.
    DirectoryCreateFailed { path: PathBuf, source: io::Error },
    /// Renaming (or copying) a file into its destination failed.
    MoveFailed {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// Listing the source directory, or reading one of its entries, failed.
    ScanFailed { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSource { path, reason } => {
                write!(f, "Invalid source directory {}: {}", path.display(), reason)
            }
            Self::DirectoryCreateFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::MoveFailed {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::ScanFailed { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidSource { .. } => None,
            Self::DirectoryCreateFailed { source, .. } | Self::ScanFailed { source, .. } => {
                Some(source)
            }
            Self::MoveFailed { source_error, .. } => Some(source_error),
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A file that was relocated successfully.
#[derive(Debug, Clone)]
pub struct MovedFile {
    /// The name the file had in the source directory, lossily decoded.
    pub file_name: String,
    /// The path the file was moved from.
    pub original_path: PathBuf,
    /// The path the file now lives at.
    pub new_path: PathBuf,
    /// Destination folder name, relative to the destination root.
    pub folder: String,
    /// Name inside the destination folder, possibly with a `_N` suffix.
    /// Lossily decoded; `new_path` holds the exact name.
    pub final_name: String,
}

impl MovedFile {
    /// Returns true if the file had to be renamed to avoid a collision.
    pub fn was_renamed(&self) -> bool {
        self.file_name != self.final_name
    }
}

/// A file that could not be relocated, with the reason.
#[derive(Debug)]
pub struct MoveFailure {
    pub file_name: String,
    pub error: OrganizeError,
}

impl std::fmt::Display for MoveFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error moving {}: {}", self.file_name, self.error)
    }
}

/// Outcome of one move attempt.
pub type MoveResult = Result<MovedFile, MoveFailure>;

/// Returns a name that does not collide with any entry in `destination_dir`.
///
/// If `desired_name` is free it is returned unchanged. Otherwise `stem_1.ext`,
/// `stem_2.ext`, ... are probed against the live directory and the first free
/// candidate wins. Names are handled as `OsStr`, so names that are not valid
/// UTF-8 keep their exact bytes. The counter has no upper bound, and the
/// result can go stale if another process creates the same name before the
/// caller uses it.
///
/// # Examples
///
/// ```no_run
/// use file_organizer::file_organizer::unique_name;
/// use std::path::Path;
///
/// // With "report.pdf" already present this yields "report_1.pdf".
/// let name = unique_name(Path::new("/tmp/Documents"), "report.pdf");
/// println!("{}", name.to_string_lossy());
/// ```
pub fn unique_name(destination_dir: &Path, desired_name: impl AsRef<OsStr>) -> OsString {
    let desired_name = desired_name.as_ref();
    if !entry_exists(&destination_dir.join(desired_name)) {
        return desired_name.to_os_string();
    }

    let (stem, extension) = split_name(desired_name);
    let mut counter: u64 = 1;
    loop {
        let mut candidate = stem.to_os_string();
        candidate.push(format!("_{}", counter));
        if let Some(ext) = extension {
            candidate.push(".");
            candidate.push(ext);
        }
        if !entry_exists(&destination_dir.join(&candidate)) {
            return candidate;
        }
        counter += 1;
    }
}

/// Splits a file name on its last dot into stem and extension.
///
/// A leading dot is part of the stem and an empty extension counts as none.
fn split_name(name: &OsStr) -> (&OsStr, Option<&OsStr>) {
    let path = Path::new(name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) if !ext.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

/// Any entry counts, including dangling symlinks.
fn entry_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Creates `root/folder` (and any missing parents) if it is not there yet.
///
/// Calling this for a folder that already exists is a no-op.
pub fn ensure_destination_dir(root: &Path, folder: &str) -> OrganizeResult<PathBuf> {
    let path = root.join(folder);
    fs::create_dir_all(&path).map_err(|e| OrganizeError::DirectoryCreateFailed {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}

/// Renames `source` to `destination`, copying across filesystems when needed.
fn relocate(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            copy_then_remove(source, destination)
        }
        Err(e) => Err(e),
    }
}

/// Copies `source` to the free path `destination`, then deletes `source`.
///
/// On failure nothing is left at `destination`: a partially written copy is
/// removed, and so is a complete copy whose source could not be deleted.
fn copy_then_remove(source: &Path, destination: &Path) -> io::Result<()> {
    if entry_exists(destination) {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", destination.display()),
        ));
    }

    if let Err(copy_error) = fs::copy(source, destination) {
        let _ = fs::remove_file(destination);
        return Err(copy_error);
    }

    if let Err(remove_error) = fs::remove_file(source) {
        let _ = fs::remove_file(destination);
        return Err(remove_error);
    }
    Ok(())
}

/// Moves files into the folders chosen by a [`CategoryTable`].
pub struct FileOrganizer<'a> {
    table: &'a CategoryTable,
}

impl<'a> FileOrganizer<'a> {
    pub fn new(table: &'a CategoryTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &'a CategoryTable {
        self.table
    }

    /// Moves one file into its destination folder under `destination_root`.
    ///
    /// The folder is resolved from the file's extension and created if
    /// absent, and the final name is made collision-free against the live
    /// folder contents. The outcome is reported to `reporter` and returned;
    /// errors are never propagated past this call.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use file_organizer::directory_walker::FileDescriptor;
    /// use file_organizer::file_category::CategoryTable;
    /// use file_organizer::file_organizer::FileOrganizer;
    /// use file_organizer::report::LogReporter;
    /// use std::path::Path;
    ///
    /// let table = CategoryTable::default();
    /// let file = FileDescriptor::from_path(Path::new("/downloads/report.pdf")).unwrap();
    /// match FileOrganizer::new(&table).move_file(&file, Path::new("/downloads"), &mut LogReporter) {
    ///     Ok(moved) => println!("Moved to {}", moved.new_path.display()),
    ///     Err(failure) => eprintln!("{}", failure),
    /// }
    /// ```
    pub fn move_file(
        &self,
        file: &FileDescriptor,
        destination_root: &Path,
        reporter: &mut dyn Reporter,
    ) -> MoveResult {
        let result = self
            .try_move(file, destination_root)
            .map_err(|error| MoveFailure {
                file_name: file.name.clone(),
                error,
            });

        match &result {
            Ok(moved) => reporter.file_moved(moved),
            Err(failure) => reporter.move_failed(failure),
        }
        result
    }

    fn try_move(&self, file: &FileDescriptor, destination_root: &Path) -> OrganizeResult<MovedFile> {
        let folder = self.table.resolve_destination(&file.extension);
        let destination_dir = ensure_destination_dir(destination_root, folder)?;

        let desired_name = file
            .path
            .file_name()
            .unwrap_or_else(|| OsStr::new(&file.name));
        let final_name = unique_name(&destination_dir, desired_name);
        let new_path = destination_dir.join(&final_name);

        relocate(&file.path, &new_path).map_err(|e| OrganizeError::MoveFailed {
            source: file.path.clone(),
            destination: new_path.clone(),
            source_error: e,
        })?;

        Ok(MovedFile {
            file_name: file.name.clone(),
            original_path: file.path.clone(),
            new_path,
            folder: folder.to_string(),
            final_name: final_name.to_string_lossy().into_owned(),
        })
    }
}
