// provscrub-core/src/redactor.rs
//! The redaction pass: apply every rule in a registry to one unit of text.
//!
//! Matching happens in three steps:
//!
//! 1. Every rule is run over the original text, in registry order. Zero-width
//!    matches and matches rejected by the rule's validator are discarded, and a
//!    replacement is generated for each survivor.
//! 2. Overlaps are resolved: earliest start wins, then the longest span, then the
//!    rule that comes first in the registry. A losing span is dropped, never trimmed.
//! 3. The winning spans are spliced in left to right.
//!
//! A rule whose matcher or placeholder generation fails is skipped for this unit
//! and recorded in `RedactionResult::rule_failures`; the other rules still apply.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use std::cmp::Reverse;
use std::sync::Arc;

use crate::redaction_match::{
    log_captured_match_debug, log_redaction_action_debug, MatchSpan, RedactionResult, RuleFailure,
};
use crate::registry::{PatternRegistry, PatternRule};
use crate::validators;

const LOG_PREFIX: &str = "[provscrub_core::redactor]";

#[derive(Debug)]
struct Candidate {
    start: usize,
    end: usize,
    rule_index: usize,
    replacement: String,
}

/// Owns a shared registry and redacts units against it.
#[derive(Debug, Clone)]
pub struct Redactor {
    registry: Arc<PatternRegistry>,
}

impl Redactor {
    pub fn new(registry: Arc<PatternRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn redact(&self, text: &str, unit_id: &str) -> RedactionResult {
        redact(text, &self.registry, unit_id)
    }
}

/// Runs one full redaction pass over `text`.
pub fn redact(text: &str, registry: &PatternRegistry, unit_id: &str) -> RedactionResult {
    let mut candidates = Vec::new();
    let mut rule_failures = Vec::new();

    for (rule_index, rule) in registry.rules().iter().enumerate() {
        match collect_rule_candidates(text, registry, rule, rule_index) {
            Ok(found) => candidates.extend(found),
            Err(reason) => {
                warn!(
                    "Rule '{}' skipped for unit '{}': {}",
                    rule.name(),
                    unit_id,
                    reason
                );
                rule_failures.push(RuleFailure {
                    rule: rule.name().to_string(),
                    reason,
                });
            }
        }
    }

    let winners = resolve_overlaps(candidates);

    let mut sanitized = String::with_capacity(text.len());
    let mut matches = Vec::with_capacity(winners.len());
    let mut last_end = 0usize;
    for candidate in winners {
        let rule = &registry.rules()[candidate.rule_index];
        let original = &text[candidate.start..candidate.end];
        log_redaction_action_debug(LOG_PREFIX, original, &candidate.replacement, rule.name());

        sanitized.push_str(&text[last_end..candidate.start]);
        sanitized.push_str(&candidate.replacement);
        last_end = candidate.end;

        matches.push(MatchSpan {
            start: candidate.start,
            end: candidate.end,
            rule: rule.descriptor.clone(),
            original: original.to_string(),
            replacement: candidate.replacement,
        });
    }
    sanitized.push_str(&text[last_end..]);

    debug!(
        "Unit '{}' redacted: {} match(es), {} rule failure(s).",
        unit_id,
        matches.len(),
        rule_failures.len()
    );

    RedactionResult {
        unit_id: unit_id.to_string(),
        original_text: text.to_string(),
        sanitized_text: sanitized,
        matches,
        rule_failures,
    }
}

fn collect_rule_candidates(
    text: &str,
    registry: &PatternRegistry,
    rule: &PatternRule,
    rule_index: usize,
) -> Result<Vec<Candidate>, String> {
    let mut found = Vec::new();
    for span in rule.matcher.find_spans(text)? {
        if span.start >= span.end
            || span.end > text.len()
            || !text.is_char_boundary(span.start)
            || !text.is_char_boundary(span.end)
        {
            continue;
        }
        if let Some(kind) = rule.validator {
            if !validators::validate(kind, text, &span) {
                continue;
            }
        }
        let original = &text[span.clone()];
        log_captured_match_debug(LOG_PREFIX, rule.name(), original);
        let replacement = registry
            .placeholders()
            .generate(rule.category(), original)
            .map_err(|e| format!("placeholder generation failed: {}", e))?;
        found.push(Candidate {
            start: span.start,
            end: span.end,
            rule_index,
            replacement,
        });
    }
    Ok(found)
}

/// Picks a non-overlapping subset: earliest start, then longest, then registry order.
fn resolve_overlaps(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by_key(|c| (c.start, Reverse(c.end - c.start), c.rule_index));
    let mut winners: Vec<Candidate> = Vec::with_capacity(candidates.len());
    let mut last_end = 0usize;
    for candidate in candidates {
        if candidate.start < last_end {
            continue;
        }
        last_end = candidate.end;
        winners.push(candidate);
    }
    winners
}
