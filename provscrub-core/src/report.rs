//! Run-level reporting.
//!
//! A `RunReport` accumulates one `UnitSummary` per redacted unit and one
//! `UnitFailure` per unit whose I/O failed. Symlinks met during a tree walk are
//! listed by id in `skipped`. The report never holds matched originals, only
//! offsets, rule identities and replacements, so it is safe to print or export
//! as JSON.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use uuid::Uuid;

use crate::config::Category;
use crate::errors::ProvscrubError;
use crate::redaction_match::{RedactionResult, RuleFailure};

/// One applied replacement, without the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub start: usize,
    pub end: usize,
    pub rule: String,
    pub category: Category,
    pub replacement: String,
}

/// What happened to one unit that was successfully read and redacted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub unit_id: String,
    /// Where the sanitized text went, or would go in a dry run.
    pub output_path: PathBuf,
    /// True only when the sanitized text was persisted.
    pub written: bool,
    pub match_count: usize,
    pub per_category_counts: BTreeMap<Category, usize>,
    pub matches: Vec<MatchSummary>,
    pub rule_failures: Vec<RuleFailure>,
}

impl UnitSummary {
    pub fn from_result(result: &RedactionResult, output_path: PathBuf, written: bool) -> Self {
        Self {
            unit_id: result.unit_id.clone(),
            output_path,
            written,
            match_count: result.matches.len(),
            per_category_counts: result.per_category_counts(),
            matches: result
                .matches
                .iter()
                .map(|m| MatchSummary {
                    start: m.start,
                    end: m.end,
                    rule: m.rule.name.clone(),
                    category: m.rule.category,
                    replacement: m.replacement.clone(),
                })
                .collect(),
            rule_failures: result.rule_failures.clone(),
        }
    }
}

/// A unit that was skipped because it could not be read or written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitFailure {
    pub unit_id: String,
    pub path: PathBuf,
    pub reason: String,
}

/// The aggregate outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: String,
    pub started_at: String,
    pub dry_run: bool,
    pub seed_fingerprint: String,
    pub units_processed: usize,
    pub total_matches: usize,
    pub per_category_counts: BTreeMap<Category, usize>,
    pub units: Vec<UnitSummary>,
    pub failures: Vec<UnitFailure>,
    /// Symlinks found while walking a tree. They are neither read nor written.
    #[serde(default)]
    pub skipped: Vec<String>,
}

impl RunReport {
    pub fn new(dry_run: bool, seed_fingerprint: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now().to_rfc3339(),
            dry_run,
            seed_fingerprint: seed_fingerprint.into(),
            units_processed: 0,
            total_matches: 0,
            per_category_counts: BTreeMap::new(),
            units: Vec::new(),
            failures: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn record_unit(&mut self, summary: UnitSummary) {
        self.units_processed += 1;
        self.total_matches += summary.match_count;
        for (category, count) in &summary.per_category_counts {
            *self.per_category_counts.entry(*category).or_insert(0) += count;
        }
        self.units.push(summary);
    }

    pub fn record_failure(&mut self, failure: UnitFailure) {
        self.failures.push(failure);
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn count_for(&self, category: Category) -> usize {
        self.per_category_counts.get(&category).copied().unwrap_or(0)
    }

    pub fn to_json_pretty(&self) -> Result<String, ProvscrubError> {
        serde_json::to_string_pretty(self).map_err(|e| ProvscrubError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, counts: &[(Category, usize)]) -> UnitSummary {
        let per_category_counts: BTreeMap<Category, usize> = counts.iter().copied().collect();
        UnitSummary {
            unit_id: id.to_string(),
            output_path: PathBuf::from(id),
            written: false,
            match_count: per_category_counts.values().sum(),
            per_category_counts,
            matches: Vec::new(),
            rule_failures: Vec::new(),
        }
    }

    #[test]
    fn test_record_unit_accumulates_counts() {
        let mut report = RunReport::new(true, "abc");
        report.record_unit(summary("a", &[(Category::Timestamp, 2)]));
        report.record_unit(summary("b", &[(Category::Timestamp, 1), (Category::FilePath, 3)]));
        assert_eq!(report.units_processed, 2);
        assert_eq!(report.total_matches, 6);
        assert_eq!(report.count_for(Category::Timestamp), 3);
        assert_eq!(report.count_for(Category::ServerName), 0);
    }

    #[test]
    fn test_json_uses_category_names() {
        let mut report = RunReport::new(false, "abc");
        report.record_unit(summary("a", &[(Category::FilePath, 1)]));
        report.record_failure(UnitFailure {
            unit_id: "c/d.txt".into(),
            path: PathBuf::from("root/c/d.txt"),
            reason: "permission denied".into(),
        });
        let json = report.to_json_pretty().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["per_category_counts"]["filepath"], 1);
        assert_eq!(value["failures"][0]["unit_id"], "c/d.txt");
        assert!(report.has_failures());
    }
}
