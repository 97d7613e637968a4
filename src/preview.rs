//! Read-only preview of what a run would do.

use crate::directory_walker::FileDescriptor;
use crate::file_category::CategoryTable;
use crate::file_organizer::OrganizeError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// How many file names a preview group shows before summarizing the rest.
pub const MAX_FILES_PER_GROUP: usize = 50;

/// Files headed for one destination folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewGroup {
    pub folder: String,
    /// Classifier result shared by the files, e.g. "Images" or "Others".
    pub category: String,
    pub files: Vec<FileDescriptor>,
}

impl PreviewGroup {
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Scanned files grouped by destination folder.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Preview {
    groups: BTreeMap<String, PreviewGroup>,
}

impl Preview {
    pub fn build(files: &[FileDescriptor], table: &CategoryTable) -> Self {
        let mut groups: BTreeMap<String, PreviewGroup> = BTreeMap::new();
        for file in files {
            let folder = table.resolve_destination(&file.extension);
            groups
                .entry(folder.to_string())
                .or_insert_with(|| PreviewGroup {
                    folder: folder.to_string(),
                    category: table.classify(&file.extension).to_string(),
                    files: Vec::new(),
                })
                .files
                .push(file.clone());
        }
        Self { groups }
    }

    /// Groups in folder-name order.
    pub fn groups(&self) -> impl Iterator<Item = &PreviewGroup> {
        self.groups.values()
    }

    pub fn group(&self, folder: &str) -> Option<&PreviewGroup> {
        self.groups.get(folder)
    }

    pub fn total_files(&self) -> usize {
        self.groups.values().map(|g| g.files.len()).sum()
    }

    pub fn total_size(&self) -> u64 {
        self.groups.values().map(PreviewGroup::total_size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn folder_count(&self) -> usize {
        self.groups.len()
    }
}

/// Machine-readable result of a dry run.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunReport<'a> {
    pub source: PathBuf,
    pub preview: &'a Preview,
    /// Problems hit while listing the source directory.
    pub errors: Vec<String>,
}

impl<'a> DryRunReport<'a> {
    pub fn new(source: &Path, preview: &'a Preview, errors: &[OrganizeError]) -> Self {
        Self {
            source: source.to_path_buf(),
            preview,
            errors: errors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Formats a byte count for humans.
///
/// # Examples
///
/// ```
/// use file_organizer::preview::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}
