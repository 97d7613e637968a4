//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored
//! output, the progress bar shown while files are moved, the preview listing
//! and the final summary table.

use crate::directory_walker::FileDescriptor;
use crate::file_category::OTHERS;
use crate::file_organizer::{MoveFailure, MovedFile, OrganizeError};
use crate::preview::{MAX_FILES_PER_GROUP, Preview, format_size};
use crate::report::{LogReporter, OrganizationStats, Reporter, plural};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use file_organizer::output::OutputFormatter;
    /// OutputFormatter::error("Failed to organize file");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates and returns a progress bar for file operations.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints the files a run would move, grouped by destination folder.
    pub fn preview(preview: &Preview) {
        Self::header("PREVIEW");

        for group in preview.groups() {
            let label = if group.category == OTHERS {
                format!("{}/ (uncategorized)", group.folder)
            } else {
                format!("{}/", group.folder)
            };
            println!(
                "{}  {} {}, {}",
                label.bold(),
                group.files.len(),
                plural(group.files.len()),
                format_size(group.total_size())
            );

            for file in group.files.iter().take(MAX_FILES_PER_GROUP) {
                println!("   - {} ({})", file.name, format_size(file.size));
            }
            if group.files.len() > MAX_FILES_PER_GROUP {
                println!(
                    "   ... and {} more files",
                    group.files.len() - MAX_FILES_PER_GROUP
                );
            }
        }

        println!(
            "\nFound {} {} to organize in {} folders ({}).",
            preview.total_files(),
            plural(preview.total_files()),
            preview.folder_count(),
            format_size(preview.total_size())
        );
    }

    /// Prints a summary table with per-folder counts and the capped error list.
    pub fn summary_table(stats: &OrganizationStats, max_errors: usize) {
        Self::header("SUMMARY");

        if stats.attempted() == 0 && stats.is_clean() {
            println!("No files were moved.");
            return;
        }

        let max_folder_len = stats
            .per_folder()
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Folder".bold(),
            "Files".bold(),
            width = max_folder_len
        );
        println!("{}", "-".repeat(max_folder_len + 10));

        for (folder, count) in stats.per_folder() {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                plural(*count),
                width = max_folder_len
            );
        }

        println!("{}", "-".repeat(max_folder_len + 10));
        println!(
            "{:<width$} | {} of {} {}",
            "Moved".bold(),
            stats.total_moved().to_string().green().bold(),
            stats.attempted(),
            plural(stats.attempted()),
            width = max_folder_len
        );

        if stats.failed() > 0 {
            println!(
                "{:<width$} | {}",
                "Failed".bold(),
                stats.failed().to_string().red().bold(),
                width = max_folder_len
            );
        }

        if !stats.is_clean() {
            Self::header(&format!("ERRORS ({})", stats.errors().len()));
            for error in stats.errors().iter().take(max_errors) {
                Self::error(error);
            }
            if stats.errors().len() > max_errors {
                Self::plain(&format!(
                    "  ... and {} more errors",
                    stats.errors().len() - max_errors
                ));
            }
        }
    }
}

/// Reporter for interactive runs: a progress bar plus one line per file,
/// with every event also forwarded to the log.
#[derive(Default)]
pub struct ConsoleReporter {
    progress: Option<ProgressBar>,
    log: LogReporter,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn line(&self, message: String) {
        match &self.progress {
            Some(pb) => pb.println(message),
            None => println!("{}", message),
        }
    }

    fn advance(&self) {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
    }
}

impl Reporter for ConsoleReporter {
    fn run_started(&mut self, source: &Path, total: usize) {
        self.log.run_started(source, total);
        OutputFormatter::info(&format!("Organizing files in: {}", source.display()));
        if total > 0 {
            self.progress = Some(OutputFormatter::create_progress_bar(total as u64));
        }
    }

    fn file_found(&mut self, file: &FileDescriptor, category: &str) {
        self.log.file_found(file, category);
        if let Some(pb) = &self.progress {
            pb.set_message(format!("Organizing: {}", file.name));
        }
    }

    fn file_moved(&mut self, moved: &MovedFile) {
        self.log.file_moved(moved);
        let message = if moved.was_renamed() {
            format!(
                "{} {} → {}/{} (renamed)",
                "✓".green(),
                moved.file_name,
                moved.folder,
                moved.final_name
            )
        } else {
            format!("{} {} → {}/", "✓".green(), moved.file_name, moved.folder)
        };
        self.line(message);
        self.advance();
    }

    fn move_failed(&mut self, failure: &MoveFailure) {
        self.log.move_failed(failure);
        self.line(format!("{} {}", "✗".red(), failure));
        self.advance();
    }

    fn scan_error(&mut self, error: &OrganizeError) {
        self.log.scan_error(error);
        self.line(format!("{} {}", "⚠".yellow(), error));
    }

    fn run_finished(&mut self, stats: &OrganizationStats) {
        self.log.run_finished(stats);
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
    }
}
