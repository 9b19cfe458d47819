// provscrub/src/logger.rs
//! Logger setup for the provscrub binary.
//!
//! Logs always go to stderr so that stdout stays reserved for `--diff` and
//! `--json-stdout` output.
//!
//! License: MIT OR APACHE 2.0

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Installs the global logger.
///
/// With `Some(level)` the level is forced regardless of `RUST_LOG`. With `None`,
/// `RUST_LOG` is honoured and the default is `info`. Calling this twice is harmless.
pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = match level {
        Some(level) => {
            let mut builder = Builder::new();
            builder.filter_level(level);
            builder
        }
        None => Builder::from_env(Env::default().default_filter_or("info")),
    };
    builder.target(Target::Stderr).format_timestamp(None);
    // A logger may already be installed (tests, embedding); keep the existing one.
    let _ = builder.try_init();
}
