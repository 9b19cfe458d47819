// provscrub/src/lib.rs
//! # provscrub CLI Application
//!
//! This crate provides the command-line front end for `provscrub-core`: argument
//! parsing, logger setup, diff and summary rendering, and the scrub command that
//! ties them together.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
