//! Pattern compilation for provscrub.
//!
//! This module turns pattern text (built-in catalogue entries and custom pattern
//! lines) into compiled matchers. A compiled matcher is an opaque capability behind
//! the [`compiler::Matcher`] trait; the redactor never looks at the pattern dialect.
//!
//! This module works closely with `config` (for rule definitions), `validators` (for
//! post-match checks), and `registry` (which owns the compiled rules).

pub mod compiler;
