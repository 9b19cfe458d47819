//! registry.rs - The active, ordered set of detection rules for one run.
//!
//! A `PatternRegistry` is assembled once from the enabled built-in categories and
//! any custom rules, then shared read-only by every redaction pass. Registry order
//! is the final tie-break when two rules match the same span.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::config::{load_builtin_rules, BuiltinRule, Category, RedactionOptions, RuleSource, RunConfig, ValidatorKind};
use crate::custom_patterns::CustomPatternLoader;
use crate::errors::ProvscrubError;
use crate::placeholders::{PlaceholderStrategy, SeededPlaceholders};
use crate::sanitizers::compiler::{compile_pattern, CompileError, Matcher};

/// Identity of a rule, as recorded on every match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleDescriptor {
    pub name: String,
    pub category: Category,
    pub source: RuleSource,
}

/// A single compiled detection rule. Immutable once built.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub descriptor: RuleDescriptor,
    pub matcher: Arc<dyn Matcher>,
    /// Optional programmatic check applied to every raw match.
    pub validator: Option<ValidatorKind>,
}

impl PatternRule {
    pub fn new(descriptor: RuleDescriptor, matcher: Arc<dyn Matcher>, validator: Option<ValidatorKind>) -> Self {
        Self { descriptor, matcher, validator }
    }

    /// Compiles one entry of the built-in catalogue.
    pub fn from_builtin(rule: &BuiltinRule) -> Result<Self, ProvscrubError> {
        let matcher = compile_pattern(&rule.name, &rule.pattern, rule.case_insensitive).map_err(|e| match e {
            CompileError::Regex(err) => ProvscrubError::RuleCompilation(rule.name.clone(), err),
            CompileError::TooLong(len) => ProvscrubError::Fatal(format!(
                "built-in rule '{}': pattern length {} exceeds the maximum",
                rule.name, len
            )),
        })?;
        Ok(Self::new(
            RuleDescriptor {
                name: rule.name.clone(),
                category: rule.category,
                source: RuleSource::BuiltIn,
            },
            Arc::new(matcher),
            rule.validator,
        ))
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn category(&self) -> Category {
        self.descriptor.category
    }

    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }
}

/// The ordered, read-only rule set plus the placeholder strategy that feeds replacements.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    rules: Vec<PatternRule>,
    placeholders: Arc<dyn PlaceholderStrategy>,
}

impl PatternRegistry {
    /// Builds a registry from the enabled built-in categories followed by `custom_rules`.
    ///
    /// Fails with `Configuration` when there is nothing to match.
    pub fn build(
        options: &RedactionOptions,
        custom_rules: Vec<PatternRule>,
        placeholders: Arc<dyn PlaceholderStrategy>,
    ) -> Result<Self, ProvscrubError> {
        if !options.any_enabled() && custom_rules.is_empty() {
            return Err(ProvscrubError::Configuration(
                "no built-in category is enabled and no custom patterns were loaded".to_string(),
            ));
        }

        let mut rules = Vec::new();
        if options.any_enabled() {
            for builtin in load_builtin_rules()?
                .iter()
                .filter(|r| options.is_enabled(r.category))
            {
                rules.push(PatternRule::from_builtin(builtin)?);
            }
        }
        rules.extend(custom_rules);

        let registry = Self::from_rules(rules, placeholders);
        info!(
            "Pattern registry ready: {} rule(s) across categories {:?}.",
            registry.len(),
            registry.categories()
        );
        Ok(registry)
    }

    /// Assembles the registry for a validated `RunConfig`, loading custom patterns from disk.
    pub fn from_config(config: &RunConfig) -> Result<Self, ProvscrubError> {
        config.validate()?;
        let custom_rules = match &config.custom_patterns {
            Some(path) => CustomPatternLoader::new(config.custom_case_insensitive).load(path)?,
            None => Vec::new(),
        };
        let placeholders = SeededPlaceholders::new(&config.seed, config.custom_placeholder.clone())
            .map_err(|e| ProvscrubError::Fatal(e.to_string()))?;
        Self::build(&config.options, custom_rules, Arc::new(placeholders))
    }

    /// Wraps an explicit rule list, dropping later duplicates of the same (category, pattern).
    pub fn from_rules(rules: Vec<PatternRule>, placeholders: Arc<dyn PlaceholderStrategy>) -> Self {
        let mut seen: HashSet<(Category, String)> = HashSet::new();
        let mut unique = Vec::with_capacity(rules.len());
        for rule in rules {
            if seen.insert((rule.category(), rule.pattern().to_string())) {
                unique.push(rule);
            } else {
                warn!(
                    "Dropping rule '{}': another {} rule already uses the pattern '{}'.",
                    rule.name(),
                    rule.category(),
                    rule.pattern()
                );
            }
        }
        debug!("Registry holds {} unique rule(s).", unique.len());
        Self { rules: unique, placeholders }
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn placeholders(&self) -> &dyn PlaceholderStrategy {
        self.placeholders.as_ref()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Distinct categories present, in first-seen order.
    pub fn categories(&self) -> Vec<Category> {
        let mut out = Vec::new();
        for rule in &self.rules {
            if !out.contains(&rule.category()) {
                out.push(rule.category());
            }
        }
        out
    }
}
