// provscrub-core/src/lib.rs
//! # provscrub Core Library
//!
//! `provscrub-core` holds the platform-independent logic for stripping provenance
//! metadata (timestamps, file paths, server names and user-defined patterns) from
//! text. It defines the detection rules, compiles them into a registry, redacts
//! text with deterministic, shape-preserving placeholders and plans runs over
//! single files or whole directory trees.
//!
//! The library performs no terminal output. All diagnostics go through the `log`
//! facade and all fallible operations return [`ProvscrubError`].
//!
//! ## Modules
//!
//! * `config`: Categories, the embedded built-in rule catalogue, `RedactionOptions` and `RunConfig`.
//! * `custom_patterns`: Loads user pattern files, one regex per line.
//! * `sanitizers`: Compiles patterns into opaque `Matcher`s.
//! * `validators`: Programmatic checks that run after a regex match.
//! * `placeholders`: The `PlaceholderStrategy` trait and the seeded default strategy.
//! * `registry`: The ordered, immutable `PatternRegistry`.
//! * `redactor`: One redaction pass with overlap resolution.
//! * `redaction_match`: Match and result types, plus PII-aware debug logging.
//! * `planner`: Unit discovery, the `UnitIo` boundary and the `RunPlanner`.
//! * `report`: The serializable `RunReport`.
//! * `headless`: One-shot helpers for sanitizing a string.
//! * `errors`: The `ProvscrubError` enum and exit code mapping.
//!
//! ## Usage Example
//!
//! ```rust
//! use provscrub_core::{headless_sanitize_string, RedactionOptions, RunConfig};
//!
//! fn main() -> Result<(), provscrub_core::ProvscrubError> {
//!     let config = RunConfig {
//!         options: RedactionOptions {
//!             remove_timestamps: true,
//!             ..Default::default()
//!         },
//!         ..Default::default()
//!     };
//!
//!     let input = "job started 2024-03-01T12:30:00Z";
//!     let sanitized = headless_sanitize_string(&config, input, "example")?;
//!     assert!(!sanitized.contains("2024-03-01T12:30:00Z"));
//!     Ok(())
//! }
//! ```
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod config;
pub mod custom_patterns;
pub mod errors;
pub mod headless;
pub mod placeholders;
pub mod planner;
pub mod redaction_match;
pub mod redactor;
pub mod registry;
pub mod report;
pub mod sanitizers;
pub mod validators;

/// Re-exports the configuration types and the built-in rule catalogue.
pub use config::{
    load_builtin_rules, BuiltinRule, Category, RedactionOptions, RuleSource, RunConfig, ValidatorKind,
    DEFAULT_PLACEHOLDER, DEFAULT_SEED, MAX_PATTERN_LENGTH,
};

pub use custom_patterns::{parse_custom_patterns, CustomPatternLoader};

/// Re-exports the error type and the process exit codes it maps to.
pub use errors::{ProvscrubError, EXIT_CONFIGURATION, EXIT_INTERNAL, EXIT_PATH};

pub use headless::{headless_redact, headless_sanitize_string};

pub use placeholders::{compute_run_seed, PlaceholderStrategy, SeededPlaceholders};

pub use planner::{discover_units, Discovery, FsUnitIo, RunPlanner, Unit, UnitIo};

/// Re-exports match and result types for detailed reporting.
pub use redaction_match::{redact_sensitive, MatchSpan, RedactionResult, RuleFailure};

pub use redactor::{redact, Redactor};

pub use registry::{PatternRegistry, PatternRule, RuleDescriptor};

pub use report::{MatchSummary, RunReport, UnitFailure, UnitSummary};

pub use sanitizers::compiler::{compile_pattern, Matcher, RegexMatcher};
