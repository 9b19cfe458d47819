// provscrub/src/commands/scrub.rs
//! The scrub command: merge configuration, plan the run, and present the results.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info, warn};
use std::io::{self, Write};
use std::sync::Arc;

use provscrub_core::{
    discover_units, PatternRegistry, ProvscrubError, RunConfig, RunPlanner, RunReport, EXIT_INTERNAL,
};

use crate::cli::Cli;
use crate::ui::{diff_viewer, output_format, summary};

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// The process exit code for an error that ended the run.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ProvscrubError>()
        .map(ProvscrubError::exit_code)
        .unwrap_or(EXIT_INTERNAL)
}

/// Builds the effective `RunConfig`: the `--config` file (if any) with CLI flags on top.
///
/// Boolean flags are OR-ed into the file's values; scalar flags replace them.
pub fn build_run_config(cli: &Cli) -> Result<RunConfig> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::load_from_file(path)
            .with_context(|| format!("Failed to load run configuration from {}", path.display()))?,
        None => RunConfig::default(),
    };

    config.options.remove_timestamps |= cli.remove_timestamps;
    config.options.remove_filepaths |= cli.remove_filepaths;
    config.options.remove_servernames |= cli.remove_servernames;
    if let Some(path) = &cli.custom_patterns {
        config.custom_patterns = Some(path.clone());
    }
    if let Some(seed) = &cli.seed {
        config.seed = seed.clone();
    }
    if let Some(placeholder) = &cli.placeholder {
        config.custom_placeholder = placeholder.clone();
    }

    config.validate()?;
    debug!("Effective run configuration: {:?}", config);
    Ok(config)
}

/// Runs one invocation end to end and returns the report.
///
/// Configuration, pattern-file and input-path problems are returned as errors
/// before any output is written. Per-unit failures are inside the report.
pub fn run_scrub(cli: &Cli) -> Result<RunReport> {
    info!("Starting provscrub operation.");
    let config = build_run_config(cli)?;
    let registry = PatternRegistry::from_config(&config)?;
    let discovery = discover_units(&cli.input, &cli.output)?;

    if discovery.units.is_empty() {
        warn_msg(format!("No files found under {}.", cli.input.display()));
    }

    let planner = RunPlanner::new(Arc::new(registry), cli.dry_run);
    let stdout = io::stdout();
    let stdout_supports_color = stdout.is_terminal();
    let mut out = stdout.lock();

    let report = planner.run_discovery(&discovery, |unit, result| {
        if cli.diff && result.is_changed() {
            if let Err(e) = diff_viewer::print_diff(
                &unit.id,
                &result.original_text,
                &result.sanitized_text,
                &mut out,
                stdout_supports_color,
            ) {
                warn!("Failed to print diff for '{}': {}", unit.id, e);
            }
        }
    });

    if cli.json_stdout {
        writeln!(out, "{}", report.to_json_pretty()?).context("Failed to write JSON report to stdout")?;
    }
    out.flush()?;

    if !cli.no_summary {
        let stderr_supports_color = io::stderr().is_terminal();
        summary::print_summary(&report, &mut io::stderr(), stderr_supports_color)?;
    }
    if cli.dry_run {
        info_msg("Dry run: no files were written.");
    }
    if report.has_failures() {
        warn_msg(format!("{} unit(s) could not be processed.", report.failures.len()));
    }

    info!("Provscrub operation completed.");
    Ok(report)
}
