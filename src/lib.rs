//! file-organizer - sort the files of a directory into category folders
//!
//! This library classifies files by extension, resolves the destination
//! folder for each one, moves it there under a collision-free name and
//! reports what happened. The category table and file filters can be loaded
//! from a TOML configuration file.

pub mod cli;
pub mod config;
pub mod directory_walker;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod preview;
pub mod report;

pub use config::{CompiledFilters, ConfigError, OrganizerConfig};
pub use directory_walker::{DirectoryWalker, FileDescriptor, organize};
pub use file_category::{Category, CategoryTable};
pub use file_organizer::{FileOrganizer, MoveFailure, MoveResult, MovedFile, OrganizeError};
pub use report::{LogReporter, OrganizationStats, Reporter};

pub use cli::{OrganizeCommand, run_cli};
