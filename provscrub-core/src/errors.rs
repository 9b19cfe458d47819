//! errors.rs - Custom error types for the provscrub-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//! The CLI maps each variant onto a process exit code via [`ProvscrubError::exit_code`].
//!
//! License: MIT OR APACHE 2.0

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for configuration and usage errors.
pub const EXIT_CONFIGURATION: i32 = 1;
/// Exit code for input/output path errors.
pub const EXIT_PATH: i32 = 2;
/// Exit code for anything unexpected.
pub const EXIT_INTERNAL: i32 = 3;

/// This enum represents all possible error types in the `provscrub-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ProvscrubError {
    /// Bad or missing option combination. Fatal; no I/O is performed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A custom pattern line that does not compile. The whole load is aborted.
    #[error("Invalid custom pattern on line {line_number} ('{raw_text}'): {reason}")]
    InvalidPattern {
        line_number: usize,
        raw_text: String,
        reason: String,
    },

    #[error("Failed to read custom pattern file {}: {source}", path.display())]
    PatternFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The `--input` or `--output` path cannot be used.
    #[error("Path error for {}: {reason}", path.display())]
    Path { path: PathBuf, reason: String },

    /// One unit could not be read or written. Recovered at the batch level.
    #[error("I/O error on unit '{unit_id}' ({}): {reason}", path.display())]
    UnitIo {
        unit_id: String,
        path: PathBuf,
        reason: String,
    },

    /// A compiled rule failed while matching. Recovered at the rule level.
    #[error("Rule '{rule}' failed during evaluation: {reason}")]
    RuleEvaluation { rule: String, reason: String },

    #[error("Failed to compile built-in rule '{0}': {1}")]
    RuleCompilation(String, regex::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(String),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}

impl ProvscrubError {
    /// The process exit code the CLI should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProvscrubError::Configuration(_) | ProvscrubError::InvalidPattern { .. } => {
                EXIT_CONFIGURATION
            }
            ProvscrubError::PatternFile { .. }
            | ProvscrubError::ConfigFile { .. }
            | ProvscrubError::Path { .. }
            | ProvscrubError::UnitIo { .. } => EXIT_PATH,
            _ => EXIT_INTERNAL,
        }
    }
}
