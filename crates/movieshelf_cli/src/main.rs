//! Command-line entry point for the movie catalog.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Bootstrap logging, then run exactly one catalog command.

mod cli;
mod commands;

use log::error;
use movieshelf_core::{default_log_level, init_logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::parse();

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    if let Err(err) = init_logging(&level, &cli.log_dir) {
        // Logging is diagnostics only; the command still runs.
        eprintln!("warning: {err}");
    }

    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=command module=cli status=error");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
