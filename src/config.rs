//! Organizer configuration.
//!
//! Everything has a built-in default, so a configuration file is optional.
//! When present it can replace the category table, rename the folder used
//! for files without an extension, and add file filtering rules:
//! - Exact filename matching
//! - Glob pattern matching
//! - File extension matching
//! - Regex pattern matching
//! - Include (whitelist) rules that override exclude rules
//!
//! # Configuration File Format
//!
//! ```toml
//! misc_folder = "MISC"
//!
//! [[categories]]
//! name = "Documents"
//! extensions = [".pdf", ".txt"]
//!
//! [[categories]]
//! name = "Images"
//! extensions = [".png", ".jpg"]
//!
//! [filters]
//! enable_hidden_files = false
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*.part"]
//! extensions = ["tmp"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```
//!
//! `categories` is an array so lookup order follows the file. When given it
//! replaces the default table entirely.

use crate::file_category::{Category, CategoryTable, DEFAULT_MISC_FOLDER};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".file-organizer.toml";

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// A category or folder entry that cannot be used.
    InvalidCategoryTable(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidCategoryTable(msg) => {
                write!(f, "Invalid category table: {}", msg)
            }
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizerConfig {
    /// Folder for files that have no extension.
    #[serde(default = "default_misc_folder")]
    pub misc_folder: String,

    /// Categories in lookup order.
    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryConfig>,

    /// Rules deciding which files are organized at all.
    #[serde(default)]
    pub filters: FilterRules,
}

/// One `[[categories]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    /// Extensions with their leading dot, e.g. `".pdf"`.
    pub extensions: Vec<String>,
}

/// File filter rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to organize hidden files (starting with "."). Defaults to false.
    #[serde(default)]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db", "desktop.ini").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.part", "~$*").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude, without the dot (e.g., "tmp", "crdownload").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

fn default_misc_folder() -> String {
    DEFAULT_MISC_FOLDER.to_string()
}

fn default_categories() -> Vec<CategoryConfig> {
    CategoryTable::default()
        .categories()
        .iter()
        .map(|category| CategoryConfig {
            name: category.name().to_string(),
            extensions: category.extensions().map(str::to_string).collect(),
        })
        .collect()
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: false,
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            misc_folder: default_misc_folder(),
            categories: default_categories(),
            filters: FilterRules::default(),
        }
    }
}

/// A validated category table together with compiled filters.
#[derive(Debug)]
pub struct CompiledConfig {
    pub table: CategoryTable,
    pub filters: CompiledFilters,
}

impl OrganizerConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.file-organizer.toml` in the current directory
    /// 3. Look for `~/.config/file-organizer/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read, or if any file found is not valid TOML.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("file-organizer")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds the category table, rejecting entries that cannot work.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCategoryTable` for an unusable folder
    /// name (empty, `.`/`..`, containing a path separator) or an extension
    /// without its leading dot.
    pub fn category_table(&self) -> Result<CategoryTable, ConfigError> {
        validate_folder_name(&self.misc_folder)?;

        let mut categories = Vec::with_capacity(self.categories.len());
        for entry in &self.categories {
            validate_folder_name(&entry.name)?;
            for ext in &entry.extensions {
                if !ext.starts_with('.') || ext.len() < 2 {
                    return Err(ConfigError::InvalidCategoryTable(format!(
                        "extension '{}' in category '{}' must look like '.ext'",
                        ext, entry.name
                    )));
                }
            }
            categories.push(Category::new(entry.name.clone(), &entry.extensions));
        }

        Ok(CategoryTable::new(categories, self.misc_folder.clone()))
    }

    /// Compile the filter rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }

    /// Validates and compiles the whole configuration.
    pub fn compile(&self) -> Result<CompiledConfig, ConfigError> {
        Ok(CompiledConfig {
            table: self.category_table()?,
            filters: self.compile_filters()?,
        })
    }
}

fn validate_folder_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() || name == "." || name == ".." {
        return Err(ConfigError::InvalidCategoryTable(format!(
            "'{}' is not a usable folder name",
            name
        )));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(ConfigError::InvalidCategoryTable(format!(
            "folder name '{}' must not contain a path separator",
            name
        )));
    }
    Ok(())
}

/// Filter rules compiled into matchers.
///
/// Paths handed to [`CompiledFilters::should_include`] are relative to the
/// directory being organized, which for a non-recursive walk is just the
/// file name.
#[derive(Debug)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Check if a file should be organized.
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always include
    /// 2. Hidden file filter - if hidden and disabled, exclude
    /// 3. Exact filename match - if matched, exclude
    /// 4. File extension match - if matched, exclude
    /// 5. Glob pattern match - if matched, exclude
    /// 6. Regex pattern match - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.include_patterns.iter().any(|p| p.matches_path(file_path)) {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self.exclude_patterns.iter().any(|p| p.matches_path(file_path)) {
            return false;
        }

        !self.exclude_regexes.iter().any(|r| r.is_match(&file_name))
    }
}

impl Default for CompiledFilters {
    /// Excludes hidden files and nothing else.
    fn default() -> Self {
        Self {
            enable_hidden_files: false,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}
