//! Extension-based file categorization.
//!
//! This module holds the ordered category table, the classifier that maps a
//! lowercase extension to a category name, and the resolver that turns an
//! extension into the name of the destination folder.
//!
//! # Examples
//!
//! ```
//! use file_organizer::file_category::CategoryTable;
//!
//! let table = CategoryTable::default();
//! assert_eq!(table.classify(".png"), "Images");
//! assert_eq!(table.classify(".xyz"), "Others");
//! assert_eq!(table.resolve_destination(".xyz"), "xyz");
//! assert_eq!(table.resolve_destination(""), "MISC");
//! ```

use std::collections::BTreeSet;

/// Category name reported for extensions that belong to no category.
pub const OTHERS: &str = "Others";

/// Folder that receives files without an extension.
pub const DEFAULT_MISC_FOLDER: &str = "MISC";

const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Documents",
        &[
            ".pdf", ".doc", ".docx", ".txt", ".xls", ".xlsx", ".ppt", ".pptx", ".odt", ".rtf",
        ],
    ),
    (
        "Images",
        &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".svg", ".webp"],
    ),
    (
        "Videos",
        &[".mp4", ".avi", ".mov", ".wmv", ".flv", ".mkv", ".webm"],
    ),
    ("Music", &[".mp3", ".wav", ".aac", ".flac", ".ogg", ".wma"]),
];

/// A named group of extensions.
///
/// Extensions are stored lowercase with their leading dot (`".pdf"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    extensions: BTreeSet<String>,
}

impl Category {
    /// Creates a category, normalizing every extension to lowercase.
    pub fn new<I, S>(name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            extensions: extensions
                .into_iter()
                .map(|ext| ext.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if `extension` (lowercase, with dot) belongs to this category.
    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

/// Ordered mapping from category name to extension set.
///
/// Lookups walk the categories in declaration order, so when an extension is
/// listed twice the first category wins. The table is built once and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<Category>,
    misc_folder: String,
}

impl CategoryTable {
    /// Creates a table from categories in lookup order.
    pub fn new(categories: Vec<Category>, misc_folder: impl Into<String>) -> Self {
        Self {
            categories,
            misc_folder: misc_folder.into(),
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Name of the folder used for files without an extension.
    pub fn misc_folder(&self) -> &str {
        &self.misc_folder
    }

    /// Returns the first category containing `extension`, if any.
    pub fn category_for(&self, extension: &str) -> Option<&Category> {
        if extension.is_empty() {
            return None;
        }
        self.categories.iter().find(|c| c.contains(extension))
    }

    /// Maps a lowercase extension (with dot, or empty) to a category name.
    ///
    /// Returns [`OTHERS`] when no category matches, including for the empty
    /// extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use file_organizer::file_category::CategoryTable;
    ///
    /// let table = CategoryTable::default();
    /// assert_eq!(table.classify(".mp3"), "Music");
    /// assert_eq!(table.classify(""), "Others");
    /// ```
    pub fn classify(&self, extension: &str) -> &str {
        self.category_for(extension)
            .map(Category::name)
            .unwrap_or(OTHERS)
    }

    /// Maps an extension to the name of its destination folder.
    ///
    /// * empty extension: the miscellaneous folder
    /// * categorized extension: the category name
    /// * anything else: the extension without its leading dot, case kept as
    ///   given, or the miscellaneous folder if nothing is left after stripping
    ///
    /// # Examples
    ///
    /// ```
    /// use file_organizer::file_category::CategoryTable;
    ///
    /// let table = CategoryTable::default();
    /// assert_eq!(table.resolve_destination(".pdf"), "Documents");
    /// assert_eq!(table.resolve_destination(".iso"), "iso");
    /// assert_eq!(table.resolve_destination("."), "MISC");
    /// ```
    pub fn resolve_destination<'a>(&'a self, extension: &'a str) -> &'a str {
        if extension.is_empty() {
            return &self.misc_folder;
        }

        if let Some(category) = self.category_for(extension) {
            return category.name();
        }

        let bare = extension.strip_prefix('.').unwrap_or(extension);
        if bare.is_empty() {
            self.misc_folder.as_str()
        } else {
            bare
        }
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .map(|(name, extensions)| Category::new(*name, extensions.iter()))
            .collect();
        Self::new(categories, DEFAULT_MISC_FOLDER)
    }
}

/// Returns the lowercase extension of a file name, including the dot.
///
/// Names without a dot, names whose only dot is the leading one (`.env`) and
/// names ending in a dot yield an empty string.
///
/// # Examples
///
/// ```
/// use file_organizer::file_category::extension_of;
///
/// assert_eq!(extension_of("Report.PDF"), ".pdf");
/// assert_eq!(extension_of("archive.tar.gz"), ".gz");
/// assert_eq!(extension_of("notes"), "");
/// ```
pub fn extension_of(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < file_name.len() => file_name[idx..].to_lowercase(),
        _ => String::new(),
    }
}
