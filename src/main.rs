use clap::Parser;
use file_organizer::cli::{Cli, RunOutcome, init_logging, prompt_for_directory, run_cli_with_config};
use file_organizer::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_file) = cli.log_path()
        && let Err(e) = init_logging(log_file, cli.verbose)
    {
        OutputFormatter::warning(&e.to_string());
    }

    log::info!("Started file organization process.");

    let directory = match cli.directory.clone() {
        Some(dir) => dir,
        None => match prompt_for_directory() {
            Ok(dir) => dir,
            Err(e) => {
                OutputFormatter::error(&e.to_string());
                return ExitCode::FAILURE;
            }
        },
    };

    match run_cli_with_config(
        cli.command(),
        &directory,
        cli.config.as_deref(),
        cli.output_mode(),
    ) {
        Ok(RunOutcome::Completed(stats)) if !stats.is_clean() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            OutputFormatter::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
