//! Integration tests for restoring against a hieronymus-style layout
//!
//! Builds `.version` directories the way hieronymus writes them and runs
//! the public restore API over them.

use ::hadmin::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Test harness holding a directory with a versioned file
pub struct VersionTestHarness {
    pub temp_dir: TempDir,
    pub filename: String,
}

impl VersionTestHarness {
    /// Create a directory containing `filename` with `content`
    pub fn new(filename: &str, content: &str) -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join(filename), content)?;
        fs::create_dir(temp_dir.path().join(".version"))?;
        Ok(Self {
            temp_dir,
            filename: filename.to_string(),
        })
    }

    /// Path of the versioned file as a string
    pub fn target(&self) -> String {
        self.temp_dir.path().join(&self.filename).display().to_string()
    }

    /// Path of a snapshot directory
    pub fn snapshot_dir(&self, snapshot: u64) -> PathBuf {
        self.temp_dir.path().join(".version").join(snapshot.to_string())
    }

    /// Add a snapshot with a baseline copy of the file
    pub fn add_snapshot(&self, snapshot: u64, baseline: &str) -> anyhow::Result<()> {
        let dir = self.snapshot_dir(snapshot);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(&self.filename), baseline)?;
        Ok(())
    }

    /// Add a patch for the file to a snapshot
    pub fn add_patch(&self, snapshot: u64, stamp: u64, body: &str) -> anyhow::Result<PathBuf> {
        let path = self
            .snapshot_dir(snapshot)
            .join(format!("{}-{}.patch", self.filename, stamp));
        fs::write(&path, body)?;
        Ok(path)
    }

    /// Restorer for the file with a fixed program
    pub fn restorer(&self, tool: PatchTool) -> Restorer {
        let config = RestoreConfig::builder(self.target())
            .tool(tool)
            .program(Some(tool.default_program().to_string()))
            .build()
            .unwrap();
        Restorer::new(config)
    }
}

fn program_available(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[test]
fn test_resolves_across_snapshots() {
    let harness = VersionTestHarness::new("report.txt", "now").unwrap();
    for snapshot in [1_295_000_000u64, 1_295_100_000, 1_295_200_000] {
        harness.add_snapshot(snapshot, "base").unwrap();
        harness.add_patch(snapshot, snapshot + 60, "p").unwrap();
        harness.add_patch(snapshot, snapshot + 3600, "p").unwrap();
    }

    let plan = harness.restorer(PatchTool::Patch).plan_at(1_295_103_000).unwrap();
    assert_eq!(plan.snapshot.name, "1295100000");
    assert_eq!(plan.patch.name, "report.txt-1295103600.patch");
    assert_eq!(plan.target_timestamp, 1_295_103_000);
}

#[test]
fn test_ignores_foreign_entries() {
    let harness = VersionTestHarness::new("report.txt", "now").unwrap();
    harness.add_snapshot(1_295_000_000, "base").unwrap();
    harness.add_patch(1_295_000_000, 1_295_000_500, "p").unwrap();

    // a removed directory parked by hieronymus and another file's patch
    fs::create_dir_all(
        harness
            .temp_dir
            .path()
            .join(".version/__DIR__old__1295000400"),
    )
    .unwrap();
    fs::write(
        harness
            .snapshot_dir(1_295_000_000)
            .join("other.txt-1295000400.patch"),
        "p",
    )
    .unwrap();

    let plan = harness.restorer(PatchTool::Xdelta).plan_at(1_295_000_400).unwrap();
    assert_eq!(plan.patch.name, "report.txt-1295000500.patch");
    assert_eq!(plan.command.program, "xdelta3");
}

#[test]
fn test_empty_versioning_dir() {
    let harness = VersionTestHarness::new("report.txt", "now").unwrap();
    let err = harness.restorer(PatchTool::Patch).plan_at(0).unwrap_err();
    assert!(err.is_missing_input());
    assert!(matches!(err, HadminError::EmptySet { what: "snapshots", .. }));
}

#[test]
fn test_snapshot_without_patches() {
    let harness = VersionTestHarness::new("report.txt", "now").unwrap();
    harness.add_snapshot(1_295_000_000, "base").unwrap();
    let err = harness.restorer(PatchTool::Patch).plan_at(0).unwrap_err();
    assert!(matches!(err, HadminError::EmptySet { what: "patches", .. }));
}

#[test]
fn test_plan_serializes() {
    let harness = VersionTestHarness::new("report.txt", "now").unwrap();
    harness.add_snapshot(1_295_000_000, "base").unwrap();
    harness.add_patch(1_295_000_000, 1_295_000_500, "p").unwrap();

    let plan = harness.restorer(PatchTool::Patch).plan_at(0).unwrap();
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["snapshot"]["name"], "1295000000");
    assert_eq!(json["command"]["program"], "patch");
    assert_eq!(json["command"]["args"][0], "-o");
}

#[test]
fn test_restore_with_gnu_patch() {
    if !program_available("patch") {
        eprintln!("patch not installed, skipping");
        return;
    }

    let harness = VersionTestHarness::new("list.txt", "a\nb\nc\nd\n").unwrap();
    harness.add_snapshot(1_295_000_000, "a\nb\nc\n").unwrap();
    harness
        .add_patch(
            1_295_000_000,
            1_295_000_600,
            "--- list.txt\n+++ list.txt\n@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n",
        )
        .unwrap();

    let outcome = harness.restorer(PatchTool::Patch).restore().unwrap();
    assert!(outcome.applied());
    let restored = fs::read_to_string(Path::new(&harness.target())).unwrap();
    assert_eq!(restored, "a\nB\nc\n");
}

#[test]
fn test_broken_patch_is_reported() {
    if !program_available("patch") {
        eprintln!("patch not installed, skipping");
        return;
    }

    let harness = VersionTestHarness::new("list.txt", "a\n").unwrap();
    harness.add_snapshot(1_295_000_000, "x\ny\nz\n").unwrap();
    harness
        .add_patch(
            1_295_000_000,
            1_295_000_600,
            "--- list.txt\n+++ list.txt\n@@ -1,3 +1,3 @@\n a\n-b\n+B\n c\n",
        )
        .unwrap();

    let err = harness.restorer(PatchTool::Patch).restore().unwrap_err();
    assert!(matches!(err, HadminError::ExternalTool { ref program, .. } if program == "patch"));
}

#[test]
fn test_restores_files_with_unusual_names() {
    for filename in ["café", "notes~", "draft.", "a+b"] {
        let harness = VersionTestHarness::new(filename, "now").unwrap();
        harness.add_snapshot(1_295_000_000, "base").unwrap();
        harness.add_patch(1_295_000_000, 1_295_000_100, "p").unwrap();

        let plan = harness
            .restorer(PatchTool::Patch)
            .plan_at(1_295_000_000)
            .unwrap_or_else(|e| panic!("{}: {:?}", filename, e));
        assert_eq!(plan.patch.name, format!("{}-1295000100.patch", filename));
    }
}

#[test]
fn test_newer_snapshot_without_file_is_passed_over() {
    let harness = VersionTestHarness::new("report.txt", "now").unwrap();
    harness.add_snapshot(1_295_000_000, "base").unwrap();
    harness.add_patch(1_295_000_000, 1_295_000_500, "p").unwrap();

    // a later snapshot started by a write to a sibling file
    let sibling = harness.snapshot_dir(1_295_100_000);
    fs::create_dir_all(&sibling).unwrap();
    fs::write(sibling.join("other.txt"), "base").unwrap();

    let plan = harness.restorer(PatchTool::Patch).plan_at(1_295_100_000).unwrap();
    assert_eq!(plan.snapshot.name, "1295000000");
}
