// provscrub/src/cli.rs
//! This file defines the command-line interface (CLI) for the provscrub application.
//! License: MIT OR APACHE 2.0

use clap::Parser;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "provscrub",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Strip timestamps, file paths and server names from files before you share them",
    long_about = "provscrub removes provenance metadata from text files: timestamps, file system paths, server names and any patterns you supply. Matches are replaced with deterministic placeholders of the same shape, so the sanitized files stay readable and internally consistent. Point it at a single file or a whole directory tree; use --dry-run to preview what would change without writing anything."
)]
pub struct Cli {
    /// Input file or directory.
    #[arg(long, short = 'i', value_name = "PATH", help = "Input file or directory to sanitize.")]
    pub input: PathBuf,

    /// Output file or directory, mirroring the shape of --input.
    #[arg(long, short = 'o', value_name = "PATH", help = "Where sanitized output goes. Mirrors the shape of --input.")]
    pub output: PathBuf,

    #[arg(long = "remove-timestamps", help = "Replace ISO-8601, log-style and epoch timestamps.")]
    pub remove_timestamps: bool,

    #[arg(long = "remove-filepaths", help = "Replace POSIX, Windows drive and UNC paths.")]
    pub remove_filepaths: bool,

    #[arg(long = "remove-servernames", help = "Replace host names and IPv4 addresses.")]
    pub remove_servernames: bool,

    /// Path to a file of extra patterns, one regular expression per line.
    #[arg(long = "custom-patterns", value_name = "FILE", help = "File of extra regex patterns, one per line. Lines starting with '#' are comments.")]
    pub custom_patterns: Option<PathBuf>,

    /// Report what would change without writing anything.
    #[arg(long = "dry-run", help = "Report what would change without writing any output.")]
    pub dry_run: bool,

    /// Path to a YAML run configuration. Flags given on the command line take precedence.
    #[arg(long = "config", value_name = "FILE", help = "Path to a YAML run configuration file.")]
    pub config: Option<PathBuf>,

    /// Seed for placeholder generation.
    #[arg(long = "seed", value_name = "TEXT", env = "PROVSCRUB_SEED", help = "Seed for deterministic placeholders.")]
    pub seed: Option<String>,

    /// Replacement token for custom-pattern matches.
    #[arg(long = "placeholder", value_name = "TEXT", help = "Token that replaces custom-pattern matches.")]
    pub placeholder: Option<String>,

    /// Show a unified diff for every unit that changed.
    #[arg(long = "diff", help = "Print a unified diff for every unit that changed.")]
    pub diff: bool,

    /// Print the run report as JSON to stdout.
    #[arg(long = "json-stdout", conflicts_with = "diff", help = "Print the run report as JSON to stdout.")]
    pub json_stdout: bool,

    /// Suppress the summary table.
    #[arg(long = "no-summary", help = "Suppress the summary table.")]
    pub no_summary: bool,

    /// Disable informational messages
    #[arg(long, short = 'q', conflicts_with = "debug", help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short = 'd', help = "Enable debug logging.")]
    pub debug: bool,
}

impl Cli {
    /// The log level requested by flags, or `None` to defer to `RUST_LOG`.
    pub fn log_level(&self) -> Option<log::LevelFilter> {
        if self.quiet {
            Some(log::LevelFilter::Off)
        } else if self.debug {
            Some(log::LevelFilter::Debug)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_parses_short_and_long_flags() {
        let cli = Cli::try_parse_from([
            "provscrub",
            "-i",
            "logs",
            "--output",
            "clean",
            "--remove-timestamps",
            "--remove-servernames",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.input, PathBuf::from("logs"));
        assert_eq!(cli.output, PathBuf::from("clean"));
        assert!(cli.remove_timestamps);
        assert!(!cli.remove_filepaths);
        assert!(cli.remove_servernames);
        assert!(cli.dry_run);
        assert_eq!(cli.log_level(), None);
    }

    #[test]
    fn test_missing_input_is_an_argument_error() {
        let err = Cli::try_parse_from(["provscrub", "-o", "out", "--remove-filepaths"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_quiet_and_debug_conflict() {
        let err = Cli::try_parse_from(["provscrub", "-i", "a", "-o", "b", "-q", "-d"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_log_levels() {
        let quiet = Cli::try_parse_from(["provscrub", "-i", "a", "-o", "b", "-q"]).unwrap();
        assert_eq!(quiet.log_level(), Some(log::LevelFilter::Off));
        let debug = Cli::try_parse_from(["provscrub", "-i", "a", "-o", "b", "--debug"]).unwrap();
        assert_eq!(debug.log_level(), Some(log::LevelFilter::Debug));
    }
}
