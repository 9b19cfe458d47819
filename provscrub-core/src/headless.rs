// provscrub-core/src/headless.rs
//! Convenience wrappers for one-shot, non-interactive sanitization of strings.
//!
//! These build a registry from a `RunConfig`, redact a single piece of text and
//! return the result. No file I/O happens unless the config names a custom
//! pattern file.

use std::sync::Arc;

use crate::config::RunConfig;
use crate::errors::ProvscrubError;
use crate::redaction_match::RedactionResult;
use crate::redactor::Redactor;
use crate::registry::PatternRegistry;

/// Fully sanitizes `content` under `config`, returning the detailed result.
///
/// # Arguments
///
/// * `config` - The run configuration (categories, custom patterns, seed).
/// * `content` - The string to be sanitized.
/// * `source_id` - A stable identifier for the input, used in logs and the result.
pub fn headless_redact(config: &RunConfig, content: &str, source_id: &str) -> Result<RedactionResult, ProvscrubError> {
    let registry = PatternRegistry::from_config(config)?;
    Ok(Redactor::new(Arc::new(registry)).redact(content, source_id))
}

/// Like [`headless_redact`], returning only the sanitized text.
pub fn headless_sanitize_string(config: &RunConfig, content: &str, source_id: &str) -> Result<String, ProvscrubError> {
    headless_redact(config, content, source_id).map(|r| r.sanitized_text)
}
