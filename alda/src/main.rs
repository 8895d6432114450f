//! The `alda` CLI tool.

use std::process::ExitCode;

use alda::cli::Cli;
use clap::Parser;
use log::LevelFilter;
use simplelog::{Config, SimpleLogger};

mod commands;

/// The main entrypoint for the `alda` executable.
///
/// Returns [`ExitCode::SUCCESS`] if every requested package resolved.
/// Returns [`ExitCode::FAILURE`] and prints errors on stderr on input
/// errors or when any request failed to resolve.
fn main() -> ExitCode {
    // Parse commandline options.
    let args = Cli::parse();

    // Init and set the verbosity level of the logger. The package list
    // goes to stdout, so the default level stays quiet.
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if let Err(error) = SimpleLogger::init(level, Config::default()) {
        eprintln!("Failed to initialize logger: {error}");
        return ExitCode::FAILURE;
    }

    match commands::resolve(args) {
        Ok(problems) if problems.is_empty() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}
