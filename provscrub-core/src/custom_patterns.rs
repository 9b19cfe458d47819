//! Loader for user-supplied custom pattern files.
//!
//! The format is UTF-8 text with one regular expression per line. Surrounding
//! whitespace is trimmed. Blank lines and lines whose first non-blank character is
//! `#` are skipped; a pattern that must start with a literal `#` can escape it as `\#`.
//!
//! Loading is all-or-nothing: the first line that fails to compile aborts the load.

use log::{debug, info};
use std::path::Path;
use std::sync::Arc;

use crate::config::{Category, RuleSource};
use crate::errors::ProvscrubError;
use crate::registry::{PatternRule, RuleDescriptor};
use crate::sanitizers::compiler::compile_pattern;

#[derive(Debug, Clone, Copy, Default)]
pub struct CustomPatternLoader {
    case_insensitive: bool,
}

impl CustomPatternLoader {
    pub fn new(case_insensitive: bool) -> Self {
        Self { case_insensitive }
    }

    /// Reads and compiles every pattern in `path`.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PatternRule>, ProvscrubError> {
        let path = path.as_ref();
        info!("Loading custom patterns from: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ProvscrubError::PatternFile {
            path: path.to_path_buf(),
            source,
        })?;
        let rules = parse_custom_patterns(&text, self.case_insensitive)?;
        info!("Loaded {} custom pattern(s) from {}.", rules.len(), path.display());
        Ok(rules)
    }
}

/// Compiles custom patterns from in-memory text. Line numbers are 1-indexed.
pub fn parse_custom_patterns(text: &str, case_insensitive: bool) -> Result<Vec<PatternRule>, ProvscrubError> {
    let mut rules = Vec::new();
    for (index, raw_line) in text.lines().enumerate() {
        let line_number = index + 1;
        let pattern = raw_line.trim();
        if pattern.is_empty() || pattern.starts_with('#') {
            continue;
        }

        let name = format!("custom_line_{}", line_number);
        let matcher = compile_pattern(&name, pattern, case_insensitive).map_err(|e| {
            ProvscrubError::InvalidPattern {
                line_number,
                raw_text: raw_line.to_string(),
                reason: e.to_string(),
            }
        })?;
        debug!("Custom pattern on line {} accepted.", line_number);

        rules.push(PatternRule::new(
            RuleDescriptor {
                name,
                category: Category::Custom,
                source: RuleSource::Custom { line_number },
            },
            Arc::new(matcher),
            None,
        ));
    }
    Ok(rules)
}
