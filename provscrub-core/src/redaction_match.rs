// provscrub-core/src/redaction_match.rs
//! Provides core data structures for redaction matches and results, plus the
//! PII-aware debug logging helpers used while a unit is being redacted.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::Category;
use crate::registry::RuleDescriptor;

lazy_static! {
    /// A static boolean that is initialized once to determine if PII is allowed in debug logs.
    static ref PII_DEBUG_ALLOWED: bool = {
        std::env::var("PROVSCRUB_ALLOW_DEBUG_PII")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// One applied replacement. Offsets are byte offsets into the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    pub rule: RuleDescriptor,
    pub original: String,
    pub replacement: String,
}

impl MatchSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A rule that was skipped for one unit because it failed while evaluating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFailure {
    pub rule: String,
    pub reason: String,
}

/// The outcome of one redaction pass over one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionResult {
    pub unit_id: String,
    pub original_text: String,
    pub sanitized_text: String,
    /// Applied spans, ordered by start offset and never overlapping.
    pub matches: Vec<MatchSpan>,
    pub rule_failures: Vec<RuleFailure>,
}

impl RedactionResult {
    pub fn is_changed(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn per_category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for m in &self.matches {
            *counts.entry(m.rule.category).or_insert(0) += 1;
        }
        counts
    }
}

pub fn redact_sensitive(s: &str) -> String {
    const MAX_LEN: usize = 8;
    if s.len() <= MAX_LEN {
        "[REDACTED]".to_string()
    } else {
        format!("[REDACTED: {} chars]", s.len())
    }
}

fn get_loggable_content(sensitive_content: &str) -> String {
    if *PII_DEBUG_ALLOWED {
        sensitive_content.to_string()
    } else {
        redact_sensitive(sensitive_content)
    }
}

pub fn log_captured_match_debug(module_path: &str, rule_name: &str, original_sensitive_content: &str) {
    debug!(
        "{} Captured match for rule '{}' (original): '{}'",
        module_path,
        rule_name,
        get_loggable_content(original_sensitive_content)
    );
}

pub fn log_redaction_action_debug(
    module_path: &str,
    original_sensitive_content: &str,
    sanitized_replacement: &str,
    rule_name: &str,
) {
    debug!(
        "{} Redaction action: Original='{}', Redacted='{}' for rule '{}'",
        module_path,
        get_loggable_content(original_sensitive_content),
        sanitized_replacement,
        rule_name
    );
}
