//! Command-line interface module.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Prompting for the directory when none is given
//! - Dry-run previews and the optional confirmation step
//! - Installing the log file sink
//! - Printing the final summary

use crate::config::{CompiledConfig, ConfigError, OrganizerConfig};
use crate::directory_walker::DirectoryWalker;
use crate::file_organizer::OrganizeError;
use crate::output::{ConsoleReporter, OutputFormatter};
use crate::preview::{DryRunReport, Preview};
use crate::report::{LogReporter, MAX_LISTED_ERRORS, OrganizationStats, RunReport};
use chrono::Utc;
use clap::Parser;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Default location of the append-only log file.
pub const DEFAULT_LOG_FILE: &str = "file_organizer.log";

#[derive(Debug, Parser)]
#[command(name = "file-organizer")]
#[command(about = "Sort the files of a directory into category folders by extension", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(help = "Directory to organize (prompted for when omitted)")]
    pub directory: Option<PathBuf>,

    #[arg(long, help = "Show what would be moved without moving anything")]
    pub dry_run: bool,

    #[arg(long, conflicts_with = "dry_run", help = "Show a preview and ask before moving")]
    pub confirm: bool,

    #[arg(long, conflicts_with = "confirm", help = "Print the result as JSON")]
    pub json: bool,

    #[arg(long, help = "Path to a configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_LOG_FILE, help = "File that receives the run log")]
    pub log_file: PathBuf,

    #[arg(long, conflicts_with = "log_file", help = "Do not write a log file")]
    pub no_log: bool,

    #[arg(long, short = 'v', help = "Log debug details")]
    pub verbose: bool,
}

impl Cli {
    pub fn command(&self) -> OrganizeCommand {
        if self.dry_run {
            OrganizeCommand::DryRun
        } else {
            OrganizeCommand::Organize {
                confirm: self.confirm,
            }
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }

    /// The log file to write, unless logging was switched off.
    pub fn log_path(&self) -> Option<&Path> {
        (!self.no_log).then_some(self.log_file.as_path())
    }
}

/// What a run should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrganizeCommand {
    /// Move the files, optionally after confirming a preview.
    Organize { confirm: bool },
    /// Only show what would happen.
    DryRun,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Human,
    Json,
}

/// How a CLI run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Files were moved (or attempted).
    Completed(OrganizationStats),
    /// Nothing was moved: dry run, or nothing to organize.
    Previewed(Preview),
    /// The user declined the confirmation prompt.
    Cancelled,
}

/// Errors that end a CLI run.
#[derive(Debug)]
pub enum CliError {
    Config(ConfigError),
    Organize(OrganizeError),
    /// Reading from the terminal failed.
    Prompt(String),
    /// The log file could not be opened or the logger was already set.
    Logging(String),
    /// Rendering JSON output failed.
    Output(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Error loading configuration: {}", e),
            CliError::Organize(e) => write!(f, "{}", e),
            CliError::Prompt(msg) => write!(f, "Could not read input: {}", msg),
            CliError::Logging(msg) => write!(f, "Could not set up logging: {}", msg),
            CliError::Output(msg) => write!(f, "Could not render output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<OrganizeError> for CliError {
    fn from(e: OrganizeError) -> Self {
        CliError::Organize(e)
    }
}

/// Installs the process-wide log file sink.
///
/// Entries are appended with RFC 3339 timestamps at `Info` level, or
/// `Debug` when `verbose` is set.
pub fn init_logging(log_file: &Path, verbose: bool) -> Result<(), CliError> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| CliError::Logging(format!("{}: {}", log_file.display(), e)))?;

    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    WriteLogger::init(level, config, file).map_err(|e| CliError::Logging(e.to_string()))
}

/// Asks for the directory to organize on the terminal.
pub fn prompt_for_directory() -> Result<PathBuf, CliError> {
    let answer: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Enter the source directory path")
        .interact_text()
        .map_err(|e| CliError::Prompt(e.to_string()))?;
    Ok(PathBuf::from(answer.trim()))
}

fn confirm_organization(total_files: usize) -> Result<bool, CliError> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "This will organize {} files. Continue?",
            total_files
        ))
        .default(false)
        .interact()
        .map_err(|e| CliError::Prompt(e.to_string()))
}

/// Runs a command against `dir_path` with configuration lookup and human output.
///
/// # Examples
///
/// ```no_run
/// use file_organizer::cli::{run_cli, OrganizeCommand};
/// use std::path::Path;
///
/// let result = run_cli(OrganizeCommand::Organize { confirm: false }, Path::new("/path/to/directory"));
/// match result {
///     Ok(_) => println!("Operation completed"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(command: OrganizeCommand, dir_path: &Path) -> Result<RunOutcome, CliError> {
    run_cli_with_config(command, dir_path, None, OutputMode::Human)
}

/// Runs a command with an optional explicit configuration file.
///
/// # Errors
///
/// Fails for configuration problems, an invalid source directory, or a
/// source directory that cannot be listed. Problems with individual files
/// are part of the returned statistics.
pub fn run_cli_with_config(
    command: OrganizeCommand,
    dir_path: &Path,
    config_path: Option<&Path>,
    mode: OutputMode,
) -> Result<RunOutcome, CliError> {
    if mode == OutputMode::Json && command == (OrganizeCommand::Organize { confirm: true }) {
        return Err(CliError::Output(
            "confirmation prompts cannot be combined with JSON output".to_string(),
        ));
    }

    let config = OrganizerConfig::load(config_path)?;
    let CompiledConfig { table, filters } = config.compile()?;
    log::debug!(
        "Using {} categories, misc folder '{}'",
        table.categories().len(),
        table.misc_folder()
    );

    let walker = DirectoryWalker::new(&table, &filters);
    let started_at = Utc::now();
    let outcome = walker.scan(dir_path)?;

    if command == OrganizeCommand::DryRun {
        let preview = Preview::build(&outcome.files, &table);
        match mode {
            OutputMode::Json => {
                print_json(&DryRunReport::new(dir_path, &preview, &outcome.errors))?
            }
            OutputMode::Human => {
                OutputFormatter::dry_run_notice(&format!(
                    "Analyzing contents of: {}",
                    dir_path.display()
                ));
                for error in &outcome.errors {
                    OutputFormatter::warning(&error.to_string());
                }
                if preview.is_empty() {
                    OutputFormatter::plain("No files found to organize.");
                } else {
                    OutputFormatter::preview(&preview);
                    OutputFormatter::dry_run_notice("No files were modified.");
                }
            }
        }
        return Ok(RunOutcome::Previewed(preview));
    }

    if command == (OrganizeCommand::Organize { confirm: true }) {
        let preview = Preview::build(&outcome.files, &table);
        if preview.is_empty() {
            OutputFormatter::plain("No files found to organize.");
            return Ok(RunOutcome::Previewed(preview));
        }
        OutputFormatter::preview(&preview);
        if !confirm_organization(preview.total_files())? {
            log::info!("Organization of {} cancelled by user", dir_path.display());
            OutputFormatter::warning("Cancelled. No files were moved.");
            return Ok(RunOutcome::Cancelled);
        }
    }

    let stats = match mode {
        OutputMode::Json => walker.organize_scanned(dir_path, outcome, &mut LogReporter),
        OutputMode::Human => {
            walker.organize_scanned(dir_path, outcome, &mut ConsoleReporter::new())
        }
    };

    match mode {
        OutputMode::Json => print_json(&RunReport::new(dir_path, started_at, stats.clone()))?,
        OutputMode::Human => {
            OutputFormatter::summary_table(&stats, MAX_LISTED_ERRORS);
            if stats.is_clean() {
                OutputFormatter::success("Organization complete!");
            } else {
                OutputFormatter::warning(
                    "Some files could not be organized. Please review errors above.",
                );
            }
        }
    }

    Ok(RunOutcome::Completed(stats))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::Output(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
