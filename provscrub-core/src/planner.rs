// provscrub-core/src/planner.rs
//! Run planning: discover units, redact each one, then write or only report.
//!
//! Units are processed one at a time. Each unit is fully read, redacted and (unless
//! this is a dry run) written before the next begins. The `RunReport` is owned by
//! the planner and only touched between units.
//!
//! I/O goes through the [`UnitIo`] trait so the planner never touches the file
//! system directly. A unit whose read or write fails becomes a `UnitFailure` in the
//! report and the batch moves on.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use crate::errors::ProvscrubError;
use crate::redaction_match::RedactionResult;
use crate::redactor::Redactor;
use crate::registry::PatternRegistry;
use crate::report::{RunReport, UnitFailure, UnitSummary};

/// One file to process and where its sanitized copy belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Path relative to the input root, with `/` separators. For a single-file
    /// input this is the file name.
    pub id: String,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

/// The boundary between the planner and wherever unit text lives.
pub trait UnitIo {
    fn read_unit(&self, unit: &Unit) -> Result<String, ProvscrubError>;
    fn write_unit(&self, unit: &Unit, contents: &str) -> Result<(), ProvscrubError>;
}

/// `UnitIo` over the local file system. Writes create missing parent directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsUnitIo;

impl UnitIo for FsUnitIo {
    fn read_unit(&self, unit: &Unit) -> Result<String, ProvscrubError> {
        let bytes = fs::read(&unit.input_path).map_err(|e| unit_io_error(unit, &unit.input_path, e.to_string()))?;
        String::from_utf8(bytes)
            .map_err(|e| unit_io_error(unit, &unit.input_path, format!("not valid UTF-8: {}", e.utf8_error())))
    }

    fn write_unit(&self, unit: &Unit, contents: &str) -> Result<(), ProvscrubError> {
        if let Some(parent) = unit.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| unit_io_error(unit, parent, e.to_string()))?;
        }
        fs::write(&unit.output_path, contents).map_err(|e| unit_io_error(unit, &unit.output_path, e.to_string()))
    }
}

fn unit_io_error(unit: &Unit, path: &Path, reason: String) -> ProvscrubError {
    ProvscrubError::UnitIo {
        unit_id: unit.id.clone(),
        path: path.to_path_buf(),
        reason,
    }
}

/// Units found under an input path, plus entries the walk could not enter.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub units: Vec<Unit>,
    pub failures: Vec<UnitFailure>,
    /// Relative ids of symlinks that were left alone.
    pub skipped: Vec<String>,
}

/// Maps `input` (a file or a directory tree) onto units whose output paths mirror it under `output`.
///
/// A single file maps to `output` itself, or to `output/<file name>` when `output`
/// is an existing directory. A directory is walked recursively in file-name order
/// without following symlinks, which are listed in `skipped`. An output root nested
/// inside the input root is left out of the walk; an output root equal to the input
/// root is refused.
pub fn discover_units(input: &Path, output: &Path) -> Result<Discovery, ProvscrubError> {
    let metadata = fs::metadata(input).map_err(|e| ProvscrubError::Path {
        path: input.to_path_buf(),
        reason: e.to_string(),
    })?;

    if metadata.is_file() {
        let file_name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let output_path = if output.is_dir() { output.join(&file_name) } else { output.to_path_buf() };
        debug!("Single-file input {} -> {}", input.display(), output_path.display());
        return Ok(Discovery {
            units: vec![Unit {
                id: file_name,
                input_path: input.to_path_buf(),
                output_path,
            }],
            failures: Vec::new(),
            skipped: Vec::new(),
        });
    }

    if !metadata.is_dir() {
        return Err(ProvscrubError::Path {
            path: input.to_path_buf(),
            reason: "input must be a regular file or a directory".to_string(),
        });
    }
    if output.is_file() {
        return Err(ProvscrubError::Path {
            path: output.to_path_buf(),
            reason: "output must be a directory when input is a directory".to_string(),
        });
    }

    let root = fs::canonicalize(input).map_err(|e| ProvscrubError::Path {
        path: input.to_path_buf(),
        reason: e.to_string(),
    })?;
    let excluded = resolve_lexically(output);
    if excluded == root {
        return Err(ProvscrubError::Path {
            path: output.to_path_buf(),
            reason: "output directory must differ from the input directory".to_string(),
        });
    }

    let mut discovery = Discovery::default();
    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.path() != excluded.as_path());

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.clone());
                warn!("Skipping unreadable entry {}: {}", path.display(), e);
                discovery.failures.push(UnitFailure {
                    unit_id: relative_id(&root, &path),
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if entry.file_type().is_symlink() {
            let id = relative_id(&root, entry.path());
            info!("Skipping symlink '{}'.", id);
            discovery.skipped.push(id);
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(&root).unwrap_or(entry.path());
        discovery.units.push(Unit {
            id: relative_id(&root, entry.path()),
            input_path: entry.path().to_path_buf(),
            output_path: output.join(relative),
        });
    }

    info!(
        "Discovered {} unit(s) under {} ({} symlink(s) skipped).",
        discovery.units.len(),
        input.display(),
        discovery.skipped.len()
    );
    Ok(discovery)
}

fn relative_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Canonical form of a path that may not exist yet, resolved through its nearest existing ancestor.
fn resolve_lexically(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => resolve_lexically(parent).join(name),
        (_, Some(name)) => std::env::current_dir().map(|d| d.join(name)).unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// Applies a redactor to a batch of units and accumulates the report.
#[derive(Debug)]
pub struct RunPlanner<I: UnitIo = FsUnitIo> {
    redactor: Redactor,
    io: I,
    dry_run: bool,
}

impl RunPlanner<FsUnitIo> {
    pub fn new(registry: Arc<PatternRegistry>, dry_run: bool) -> Self {
        Self::with_io(registry, FsUnitIo, dry_run)
    }
}

impl<I: UnitIo> RunPlanner<I> {
    pub fn with_io(registry: Arc<PatternRegistry>, io: I, dry_run: bool) -> Self {
        Self {
            redactor: Redactor::new(registry),
            io,
            dry_run,
        }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn run(&self, units: &[Unit]) -> RunReport {
        self.run_with(units, |_, _| {})
    }

    /// Like [`RunPlanner::run`], calling `observe` with every successful redaction.
    /// The CLI uses this to render dry-run diffs.
    pub fn run_with<F>(&self, units: &[Unit], mut observe: F) -> RunReport
    where
        F: FnMut(&Unit, &RedactionResult),
    {
        let fingerprint = self.redactor.registry().placeholders().fingerprint();
        let mut report = RunReport::new(self.dry_run, fingerprint);
        info!(
            "Starting {}run over {} unit(s).",
            if self.dry_run { "dry " } else { "" },
            units.len()
        );

        for unit in units {
            match self.process_unit(unit) {
                Ok((result, summary)) => {
                    observe(unit, &result);
                    report.record_unit(summary);
                }
                Err(e) => {
                    warn!("Unit '{}' skipped: {}", unit.id, e);
                    let (path, reason) = match e {
                        ProvscrubError::UnitIo { path, reason, .. } => (path, reason),
                        other => (unit.input_path.clone(), other.to_string()),
                    };
                    report.record_failure(UnitFailure {
                        unit_id: unit.id.clone(),
                        path,
                        reason,
                    });
                }
            }
        }

        info!(
            "Run finished: {} unit(s) processed, {} match(es), {} failure(s).",
            report.units_processed,
            report.total_matches,
            report.failures.len()
        );
        report
    }

    /// Runs a discovery, carrying its walk failures into the report.
    pub fn run_discovery<F>(&self, discovery: &Discovery, observe: F) -> RunReport
    where
        F: FnMut(&Unit, &RedactionResult),
    {
        let mut report = self.run_with(&discovery.units, observe);
        for failure in &discovery.failures {
            report.record_failure(failure.clone());
        }
        report.skipped.extend(discovery.skipped.iter().cloned());
        report
    }

    /// Reads, redacts and (outside a dry run) writes a single unit.
    pub fn process_unit(&self, unit: &Unit) -> Result<(RedactionResult, UnitSummary), ProvscrubError> {
        let text = self.io.read_unit(unit)?;
        let result = self.redactor.redact(&text, &unit.id);

        let written = if self.dry_run {
            info!(
                "Dry run: {} change(s) would be written to {}.",
                result.matches.len(),
                unit.output_path.display()
            );
            false
        } else {
            self.io.write_unit(unit, &result.sanitized_text)?;
            info!("Sanitized data written to {}", unit.output_path.display());
            true
        };

        let summary = UnitSummary::from_result(&result, unit.output_path.clone(), written);
        Ok((result, summary))
    }
}
