//! End-to-end tests for recomp CLI commands.
//!
//! These tests run the binary against analysis and change-window files
//! written to a temporary directory.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin for tests

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

const ANALYSIS: &str = r#"{
    "units": {
        "app.Main": ["lib.Service"],
        "lib.Service": ["lib.Model"],
        "lib.Model": [],
        "lib.Constants": [],
        "old.Legacy": [],
        "app.Report": ["old.Legacy"],
        "cyc.A": ["cyc.B"],
        "cyc.B": ["cyc.A"]
    },
    "constant_bearing": ["lib.Constants"]
}"#;

const MAPPING: &str = r#"{
    "src/lib/Model.java": ["lib.Model"],
    "src/lib/Constants.java": ["lib.Constants"],
    "src/old/Legacy.java": ["old.Legacy"],
    "src/lib/Fresh.java": ["lib.Fresh", "lib.Fresh$Builder"]
}"#;

/// Temporary workspace holding the analysis file and one change window.
struct TestBuild {
    temp_dir: TempDir,
}

impl TestBuild {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("analysis.json"), ANALYSIS).expect("Failed to write analysis");
        Self { temp_dir }
    }

    fn analysis(&self) -> PathBuf {
        self.temp_dir.path().join("analysis.json")
    }

    /// Write a change window with the shared mapping and the given changes.
    fn changes(&self, changes: &str) -> PathBuf {
        let path = self.temp_dir.path().join("changes.json");
        let window = format!(r#"{{"mapping": {}, "changes": {}}}"#, MAPPING, changes);
        fs::write(&path, window).expect("Failed to write change window");
        path
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("Failed to write file");
        path
    }
}

fn recomp() -> Command {
    Command::cargo_bin("recomp").expect("binary built")
}

// =============================================================================
// plan
// =============================================================================

#[test]
fn test_plan_transitive_closure() {
    let build = TestBuild::new();
    let changes = build.changes(r#"[{"path": "src/lib/Model.java", "kind": "modified"}]"#);

    recomp()
        .args(["plan", "--analysis"])
        .arg(build.analysis())
        .arg("--changes")
        .arg(changes)
        .assert()
        .success()
        .stdout(predicate::str::contains("3 units to compile"))
        .stdout(predicate::str::contains("app.Main"))
        .stdout(predicate::str::contains("lib.Service"));
}

#[test]
fn test_plan_json_output() {
    let build = TestBuild::new();
    let changes = build.changes(r#"[{"path": "src/old/Legacy.java", "kind": "removed"}]"#);

    let output = recomp()
        .args(["plan", "--format", "json", "--analysis"])
        .arg(build.analysis())
        .arg("--changes")
        .arg(changes)
        .output()
        .expect("Failed to run recomp");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(report["full_rebuild"], false);
    assert_eq!(report["units_to_delete"], serde_json::json!(["old.Legacy"]));
    let mut compile: Vec<String> = report["units_to_compile"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    compile.sort();
    assert_eq!(compile, vec!["app.Report", "old.Legacy"]);
}

#[test]
fn test_plan_constant_bearing_forces_full_rebuild() {
    let build = TestBuild::new();
    let changes = build.changes(r#"[{"path": "src/lib/Constants.java", "kind": "modified"}]"#);

    recomp()
        .args(["plan", "--parallel", "--analysis"])
        .arg(build.analysis())
        .arg("--changes")
        .arg(changes)
        .assert()
        .success()
        .stdout(predicate::str::contains("Full rebuild required"))
        .stdout(predicate::str::contains("lib.Constants"))
        .stdout(predicate::str::contains("constant-bearing"));
}

#[test]
fn test_plan_added_nested_units() {
    let build = TestBuild::new();
    let changes = build.changes(r#"[{"path": "src/lib/Fresh.java", "kind": "added"}]"#);

    recomp()
        .args(["plan", "--analysis"])
        .arg(build.analysis())
        .arg("--changes")
        .arg(changes)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 units to compile"))
        .stdout(predicate::str::contains("lib.Fresh$Builder"));
}

#[test]
fn test_plan_corrupt_analysis_means_full_rebuild() {
    let build = TestBuild::new();
    let analysis = build.write("broken.json", "{ not json");
    let changes = build.changes(r#"[{"path": "src/lib/Model.java", "kind": "modified"}]"#);

    recomp()
        .args(["plan", "--analysis"])
        .arg(analysis)
        .arg("--changes")
        .arg(changes)
        .assert()
        .success()
        .stdout(predicate::str::contains("missing-graph"));
}

#[test]
fn test_plan_unmapped_source_fails() {
    let build = TestBuild::new();
    let changes = build.changes(r#"[{"path": "src/Unknown.java", "kind": "modified"}]"#);

    recomp()
        .args(["plan", "--analysis"])
        .arg(build.analysis())
        .arg("--changes")
        .arg(changes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("src/Unknown.java"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn test_plan_empty_window_is_up_to_date() {
    let build = TestBuild::new();
    let changes = build.changes("[]");

    recomp()
        .args(["plan", "--analysis"])
        .arg(build.analysis())
        .arg("--changes")
        .arg(changes)
        .assert()
        .success()
        .stdout(predicate::str::contains("Up to date"));
}

#[test]
fn test_plan_rejects_zero_workers() {
    let build = TestBuild::new();
    let changes = build.changes("[]");

    recomp()
        .args(["plan", "--workers", "0", "--analysis"])
        .arg(build.analysis())
        .arg("--changes")
        .arg(changes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_workers"));
}

// =============================================================================
// dependents / cycles
// =============================================================================

#[test]
fn test_dependents_direct_and_transitive() {
    let build = TestBuild::new();

    recomp()
        .args(["dependents", "lib.Model", "--analysis"])
        .arg(build.analysis())
        .assert()
        .success()
        .stdout("lib.Service\n");

    recomp()
        .args(["dependents", "lib.Model", "--transitive", "--analysis"])
        .arg(build.analysis())
        .assert()
        .success()
        .stdout("app.Main\nlib.Service\n");
}

#[test]
fn test_dependents_unknown_unit_fails() {
    let build = TestBuild::new();

    recomp()
        .args(["dependents", "nope.Missing", "--analysis"])
        .arg(build.analysis())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no dependency record"));
}

#[test]
fn test_cycles_report() {
    let build = TestBuild::new();

    recomp()
        .args(["cycles", "--analysis"])
        .arg(build.analysis())
        .assert()
        .success()
        .stdout(predicate::str::contains("cyc.A -> cyc.B"));
}
