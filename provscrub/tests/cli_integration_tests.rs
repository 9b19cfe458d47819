// provscrub/tests/cli_integration_tests.rs
//! Command-line integration tests for the `provscrub` binary.
//!
//! These drive the compiled executable with `assert_cmd` against fixture trees
//! built in `tempfile` directories, and check exit codes, written files, stdout
//! (diffs and JSON) and the stderr summary.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use test_log::test;

use strip_ansi_escapes::strip as strip_ansi_escapes_fn;

const SAMPLE: &str = "2024-03-01T12:30:00Z opened /srv/data/report.csv on build-07.corp.internal\n";

fn provscrub() -> Command {
    let mut cmd = Command::cargo_bin("provscrub").unwrap();
    cmd.env("RUST_LOG", "debug");
    cmd.env_remove("PROVSCRUB_SEED");
    cmd.env_remove("PROVSCRUB_ALLOW_DEBUG_PII");
    cmd
}

fn strip_ansi(bytes: &[u8]) -> String {
    String::from_utf8_lossy(&strip_ansi_escapes_fn(bytes)).to_string()
}

fn write(path: &Path, contents: &[u8]) -> Result<()> {
    fs::create_dir_all(path.parent().unwrap())?;
    fs::write(path, contents)?;
    Ok(())
}

#[test]
fn test_help_exits_zero() {
    provscrub()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--remove-timestamps"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_missing_input_exits_one() {
    provscrub()
        .args(["--output", "out", "--remove-timestamps"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn test_no_category_enabled_exits_one() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("in.log");
    fs::write(&input, SAMPLE)?;
    provscrub()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.log"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nothing to do"));
    assert!(!dir.path().join("out.log").exists());
    Ok(())
}

#[test]
fn test_nonexistent_input_exits_two() -> Result<()> {
    let dir = tempdir()?;
    provscrub()
        .arg("-i")
        .arg(dir.path().join("missing"))
        .arg("-o")
        .arg(dir.path().join("out"))
        .arg("--remove-filepaths")
        .assert()
        .code(2);
    Ok(())
}

#[test]
fn test_invalid_custom_pattern_exits_one_and_names_line() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("in.log");
    fs::write(&input, SAMPLE)?;
    let patterns = dir.path().join("patterns.txt");
    fs::write(&patterns, "foo.*bar\n# comment\n\n[unclosed\n")?;

    provscrub()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.log"))
        .arg("--custom-patterns")
        .arg(&patterns)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("line 4"));
    assert!(!dir.path().join("out.log").exists());
    Ok(())
}

#[test]
fn test_single_file_is_sanitized() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("in.log");
    let output = dir.path().join("out.log");
    fs::write(&input, SAMPLE)?;

    let assert = provscrub()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--remove-timestamps", "--remove-filepaths", "--remove-servernames"])
        .assert()
        .success();

    let sanitized = fs::read_to_string(&output)?;
    assert!(!sanitized.contains("2024-03-01T12:30:00Z"));
    assert!(!sanitized.contains("/srv/data/report.csv"));
    assert!(!sanitized.contains("build-07.corp.internal"));
    assert!(sanitized.contains(" opened /"));
    assert!(sanitized.contains(".csv on "));
    assert!(sanitized.trim_end().ends_with(".internal"));

    let stderr = strip_ansi(&assert.get_output().stderr);
    assert!(stderr.contains("Provscrub Summary"));
    assert!(stderr.contains("Units processed: 1, matches: 3, failures: 0"));
    // Debug logs mask matched originals by default.
    assert!(!stderr.contains("build-07.corp.internal"));
    Ok(())
}

#[test]
fn test_same_seed_gives_identical_output() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("in.log");
    fs::write(&input, SAMPLE)?;
    for name in ["a.log", "b.log"] {
        provscrub()
            .arg("-i")
            .arg(&input)
            .arg("-o")
            .arg(dir.path().join(name))
            .args(["--remove-timestamps", "--remove-servernames", "--seed", "fixture"])
            .assert()
            .success();
    }
    assert_eq!(
        fs::read_to_string(dir.path().join("a.log"))?,
        fs::read_to_string(dir.path().join("b.log"))?
    );
    Ok(())
}

#[test]
fn test_dry_run_writes_nothing_and_reports_matches() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path().join("root");
    let out_root = dir.path().join("outRoot");
    write(&root.join("a/b.txt"), SAMPLE.as_bytes())?;

    let assert = provscrub()
        .arg("-i")
        .arg(&root)
        .arg("-o")
        .arg(&out_root)
        .args(["--remove-timestamps", "--dry-run", "--json-stdout", "--no-summary"])
        .assert()
        .success();

    assert!(!out_root.exists());
    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout)?;
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["total_matches"], 1);
    assert_eq!(report["per_category_counts"]["timestamp"], 1);
    assert_eq!(report["units"][0]["unit_id"], "a/b.txt");
    assert_eq!(report["units"][0]["written"], false);
    // The JSON report never carries matched originals.
    assert!(!String::from_utf8_lossy(&assert.get_output().stdout).contains("2024-03-01T12:30:00Z"));
    Ok(())
}

#[test]
fn test_dry_run_diff_shows_change() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("in.log");
    fs::write(&input, SAMPLE)?;

    let assert = provscrub()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.log"))
        .args(["--remove-timestamps", "--dry-run", "--diff"])
        .assert()
        .success();

    let stdout = strip_ansi(&assert.get_output().stdout);
    assert!(stdout.contains("--- in.log (original)"));
    assert!(stdout.contains("-2024-03-01T12:30:00Z opened"));
    assert!(stdout.contains("+"));
    assert!(!dir.path().join("out.log").exists());
    Ok(())
}

#[test]
fn test_directory_tree_with_unreadable_unit_exits_two() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path().join("root");
    let out_root = dir.path().join("outRoot");
    write(&root.join("a/b.txt"), SAMPLE.as_bytes())?;
    write(&root.join("c/d.txt"), &[0xff, 0xfe, 0xfd])?;

    let assert = provscrub()
        .arg("-i")
        .arg(&root)
        .arg("-o")
        .arg(&out_root)
        .arg("--remove-filepaths")
        .assert()
        .code(2);

    let sanitized = fs::read_to_string(out_root.join("a/b.txt"))?;
    assert!(!sanitized.contains("/srv/data/report.csv"));
    assert!(!out_root.join("c/d.txt").exists());

    let stderr = strip_ansi(&assert.get_output().stderr);
    assert!(stderr.contains("failures: 1"));
    assert!(stderr.contains("c/d.txt"));
    Ok(())
}

#[test]
fn test_config_file_and_custom_patterns() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("in.log");
    let output = dir.path().join("out.log");
    fs::write(&input, "ticket JIRA-4411 closed at 2024-03-01 12:30:00\n")?;
    let patterns = dir.path().join("patterns.txt");
    fs::write(&patterns, "# ticket ids\nJIRA-\\d+\n")?;
    let config = dir.path().join("run.yaml");
    fs::write(
        &config,
        format!(
            "remove_timestamps: true\ncustom_patterns: {}\ncustom_placeholder: \"<ticket>\"\n",
            patterns.display()
        ),
    )?;

    provscrub()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--config")
        .arg(&config)
        .assert()
        .success();

    let sanitized = fs::read_to_string(&output)?;
    assert!(sanitized.starts_with("ticket <ticket> closed at "));
    assert!(!sanitized.contains("2024-03-01 12:30:00"));
    Ok(())
}

#[test]
fn test_unreadable_config_file_exits_two() -> Result<()> {
    let dir = tempdir()?;
    let input = dir.path().join("in.log");
    fs::write(&input, SAMPLE)?;
    provscrub()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("out.log"))
        .arg("--config")
        .arg(dir.path().join("absent.yaml"))
        .arg("--remove-timestamps")
        .assert()
        .code(2);
    Ok(())
}
