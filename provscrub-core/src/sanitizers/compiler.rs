//! compiler.rs - Compiles pattern text into matchers.
//!
//! The `Matcher` trait is the seam between the redactor and the pattern engine.
//! `RegexMatcher` is the only production implementation; tests substitute their
//! own to exercise rule-level failure handling.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::ops::Range;
use thiserror::Error;

use crate::config::MAX_PATTERN_LENGTH;

/// Compiled regex size ceiling.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A compiled pattern that reports byte ranges of its matches.
///
/// Implementations must be read-only during matching so a registry can be shared.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// The pattern text this matcher was compiled from.
    fn pattern(&self) -> &str;

    /// Returns every non-overlapping match, in order, as byte ranges into `text`.
    ///
    /// An `Err` means the matcher could not evaluate this text. The caller skips
    /// the rule for this unit instead of aborting.
    fn find_spans(&self, text: &str) -> Result<Vec<Range<usize>>, String>;
}

/// A `Matcher` backed by the `regex` crate.
#[derive(Debug)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    pub fn new(regex: Regex) -> Self {
        Self { regex }
    }
}

impl Matcher for RegexMatcher {
    fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    fn find_spans(&self, text: &str) -> Result<Vec<Range<usize>>, String> {
        Ok(self.regex.find_iter(text).map(|m| m.range()).collect())
    }
}

/// Why a pattern was refused.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("pattern length ({0}) exceeds maximum allowed ({max})", max = MAX_PATTERN_LENGTH)]
    TooLong(usize),
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// Compiles a single pattern into a `RegexMatcher`.
pub fn compile_pattern(
    name: &str,
    pattern: &str,
    case_insensitive: bool,
) -> Result<RegexMatcher, CompileError> {
    debug!(
        "Attempting to compile rule: '{}' with pattern '{:?}'",
        name, pattern
    );

    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(CompileError::TooLong(pattern.len()));
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()?;

    log::debug!(
        target: "provscrub_core::sanitizer",
        "Rule '{}' compiled successfully.",
        name
    );
    Ok(RegexMatcher::new(regex))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_and_find_spans() {
        let m = compile_pattern("digits", r"\d+", false).unwrap();
        assert_eq!(m.find_spans("a1b22c").unwrap(), vec![1..2, 3..5]);
        assert_eq!(m.pattern(), r"\d+");
    }

    #[test]
    fn test_case_insensitive_flag() {
        let m = compile_pattern("host", "host-\\d+", true).unwrap();
        assert_eq!(m.find_spans("HOST-12").unwrap(), vec![0..7]);
    }

    #[test]
    fn test_rejects_overlong_pattern() {
        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let err = compile_pattern("long", &long, false).unwrap_err();
        assert!(matches!(err, CompileError::TooLong(len) if len == MAX_PATTERN_LENGTH + 1));
        assert_eq!(
            err.to_string(),
            format!("pattern length ({}) exceeds maximum allowed ({})", MAX_PATTERN_LENGTH + 1, MAX_PATTERN_LENGTH)
        );
    }

    #[test]
    fn test_rejects_invalid_regex() {
        let err = compile_pattern("bad", "[unclosed", false).unwrap_err();
        assert!(matches!(err, CompileError::Regex(_)));
        assert!(err.to_string().contains("unclosed"));
    }
}
