//! Configuration management for `provscrub-core`.
//!
//! This module defines the rule categories, the embedded built-in rule catalogue,
//! and the typed run configuration (`RunConfig`). It handles YAML deserialization
//! of both and validates a configuration before any registry is built.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::errors::ProvscrubError;

/// Maximum allowed length for a pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Token used for custom-pattern matches unless configured otherwise.
pub const DEFAULT_PLACEHOLDER: &str = "[REDACTED]";

/// Seed text used when the caller does not supply one.
pub const DEFAULT_SEED: &str = "provscrub-default-seed";

/// The four redaction classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Timestamp,
    #[serde(rename = "filepath")]
    FilePath,
    #[serde(rename = "servername")]
    ServerName,
    Custom,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Timestamp => "timestamp",
            Category::FilePath => "filepath",
            Category::ServerName => "servername",
            Category::Custom => "custom",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a rule came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RuleSource {
    BuiltIn,
    Custom { line_number: usize },
}

/// Post-match programmatic checks a built-in rule may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidatorKind {
    Epoch,
    CalendarDatetime,
    Ipv4,
    PathBoundary,
}

/// A single entry of the embedded built-in rule catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BuiltinRule {
    /// Unique identifier for the rule (e.g., "iso8601_timestamp").
    pub name: String,
    pub category: Category,
    /// Human-readable description of what the rule targets.
    #[serde(default)]
    pub description: Option<String>,
    /// The regex pattern string.
    pub pattern: String,
    #[serde(default)]
    pub case_insensitive: bool,
    #[serde(default)]
    pub validator: Option<ValidatorKind>,
}

#[derive(Debug, Deserialize)]
struct BuiltinCatalogue {
    rules: Vec<BuiltinRule>,
}

/// Loads the built-in rule catalogue from the embedded YAML.
pub fn load_builtin_rules() -> Result<Vec<BuiltinRule>, ProvscrubError> {
    debug!("Loading built-in rules from embedded string...");
    let yaml = include_str!("../config/builtin_rules.yaml");
    let catalogue: BuiltinCatalogue = serde_yml::from_str(yaml)
        .map_err(|e| ProvscrubError::Fatal(format!("Failed to parse built-in rules: {}", e)))?;
    debug!("Loaded {} built-in rules.", catalogue.rules.len());
    Ok(catalogue.rules)
}

/// Which built-in categories are switched on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RedactionOptions {
    pub remove_timestamps: bool,
    pub remove_filepaths: bool,
    pub remove_servernames: bool,
}

impl RedactionOptions {
    pub fn is_enabled(&self, category: Category) -> bool {
        match category {
            Category::Timestamp => self.remove_timestamps,
            Category::FilePath => self.remove_filepaths,
            Category::ServerName => self.remove_servernames,
            Category::Custom => false,
        }
    }

    pub fn any_enabled(&self) -> bool {
        self.remove_timestamps || self.remove_filepaths || self.remove_servernames
    }

    pub fn enabled_categories(&self) -> Vec<Category> {
        [Category::Timestamp, Category::FilePath, Category::ServerName]
            .into_iter()
            .filter(|c| self.is_enabled(*c))
            .collect()
    }
}

/// The full configuration for one run. Loadable from YAML; the CLI overlays its flags on top.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    #[serde(flatten)]
    pub options: RedactionOptions,
    /// Path to a file of custom patterns, one per line.
    pub custom_patterns: Option<PathBuf>,
    /// Replacement token for custom-pattern matches.
    pub custom_placeholder: String,
    /// If true, custom patterns are compiled case-insensitively.
    pub custom_case_insensitive: bool,
    /// Seed for placeholder generation.
    pub seed: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            options: RedactionOptions::default(),
            custom_patterns: None,
            custom_placeholder: DEFAULT_PLACEHOLDER.to_string(),
            custom_case_insensitive: false,
            seed: DEFAULT_SEED.to_string(),
        }
    }
}

impl RunConfig {
    /// Loads a run configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ProvscrubError> {
        let path = path.as_ref();
        info!("Loading run configuration from: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ProvscrubError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig = serde_yml::from_str(&text).map_err(|e| {
            ProvscrubError::Configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!("Parsed run configuration: {:?}", config);
        Ok(config)
    }

    /// Rejects configurations that would do nothing, and empty placeholder or seed values.
    pub fn validate(&self) -> Result<(), ProvscrubError> {
        if !self.options.any_enabled() && self.custom_patterns.is_none() {
            return Err(ProvscrubError::Configuration(
                "nothing to do: enable at least one of --remove-timestamps, --remove-filepaths, \
                 --remove-servernames or supply --custom-patterns"
                    .to_string(),
            ));
        }
        if self.custom_placeholder.is_empty() {
            return Err(ProvscrubError::Configuration(
                "custom placeholder must not be empty".to_string(),
            ));
        }
        if self.seed.trim().is_empty() {
            return Err(ProvscrubError::Configuration("seed must not be empty".to_string()));
        }
        Ok(())
    }
}
