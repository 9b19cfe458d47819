// provscrub/src/main.rs
//! provscrub entry point.
//!
//! Parses arguments, installs the logger and runs the scrub command, mapping the
//! outcome onto the process exit code.

use clap::Parser;
use clap::error::ErrorKind;
use std::process::ExitCode;

use provscrub::cli::Cli;
use provscrub::commands::scrub::{error_msg, exit_code_for, run_scrub};
use provscrub::logger;
use provscrub_core::{EXIT_CONFIGURATION, EXIT_PATH};

fn exit_with(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => exit_with(EXIT_CONFIGURATION),
            };
        }
    };

    logger::init_logger(cli.log_level());

    match run_scrub(&cli) {
        Ok(report) if report.has_failures() => exit_with(EXIT_PATH),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error_msg(format!("{:#}", e));
            exit_with(exit_code_for(&e))
        }
    }
}
