// provscrub/src/ui/mod.rs
//! Terminal presentation: status messages, diffs and the run summary.

pub mod diff_viewer;
pub mod output_format;
pub mod summary;
