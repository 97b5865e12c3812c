mod common;

use common::{filelist_cmd, read_json, scan_into, write_tree};
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn write_manifests(dir: &std::path::Path) {
    fs::write(dir.join("a.json"), r#"{"x": 10, "y": 20}"#).unwrap();
    fs::write(
        dir.join("b.json"),
        r#"{"source_directory": "/mnt/b", "total_files": 2, "total_size": 30, "files": {"y": 25, "z": 5}}"#,
    )
    .unwrap();
}

#[test]
fn compare_reports_partition_and_exits_unclean() {
    let temp = TempDir::new().unwrap();
    write_manifests(temp.path());

    filelist_cmd(temp.path())
        .arg("compare")
        .arg("a.json")
        .arg("b.json")
        .arg("--no-script")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "In both:          1  (A: 20 bytes, B: 25 bytes)",
        ))
        .stdout(predicate::str::contains("Only in A:        1  (10 bytes)"))
        .stdout(predicate::str::contains("Only in B:        1  (5 bytes)"))
        .stdout(predicate::str::contains("Size differs for 1 shared files"))
        .stdout(predicate::str::contains("Source:      /mnt/b"));

    assert!(!temp.path().join("zip_different_files.py").exists());
}

#[test]
fn compare_list_shows_each_difference() {
    let temp = TempDir::new().unwrap();
    write_manifests(temp.path());

    filelist_cmd(temp.path())
        .arg("compare")
        .arg("a.json")
        .arg("b.json")
        .arg("--no-script")
        .arg("--list")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("A  x\n"))
        .stdout(predicate::str::contains("B  z\n"))
        .stdout(predicate::str::contains("~  y (20 bytes -> 25 bytes)\n"));
}

#[test]
fn compare_writes_default_archive_script() {
    let temp = TempDir::new().unwrap();
    write_manifests(temp.path());

    filelist_cmd(temp.path())
        .arg("compare")
        .arg("a.json")
        .arg("b.json")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Archive script for 2 files written to zip_different_files.py",
        ));

    let script = temp.path().join("zip_different_files.py");
    filelist_cmd(temp.path())
        .arg("script-paths")
        .arg(&script)
        .assert()
        .success()
        .stdout("x\nz\n");
}

#[test]
fn compare_writes_script_to_chosen_path() {
    let temp = TempDir::new().unwrap();
    write_manifests(temp.path());

    filelist_cmd(temp.path())
        .arg("compare")
        .arg("a.json")
        .arg("b.json")
        .arg("--script")
        .arg("collect.py")
        .assert()
        .code(1);

    assert!(temp.path().join("collect.py").exists());
    assert!(!temp.path().join("zip_different_files.py").exists());
}

#[test]
fn compare_writes_report() {
    let temp = TempDir::new().unwrap();
    write_manifests(temp.path());

    filelist_cmd(temp.path())
        .arg("compare")
        .arg("a.json")
        .arg("b.json")
        .arg("--no-script")
        .arg("--report")
        .arg("report.json")
        .assert()
        .code(1);

    let report = read_json(&temp.path().join("report.json"));
    assert_eq!(report["summary"]["in_both"], 1);
    assert_eq!(report["summary"]["size_only_a"], 10);
    assert_eq!(report["summary"]["size_only_b"], 5);
    assert_eq!(report["files_only_in_a"], json!({"x": 10}));
    assert_eq!(report["files_only_in_b"], json!({"z": 5}));
    assert_eq!(
        report["files_in_both"],
        json!({"y": {"size_a": 20, "size_b": 25}})
    );
}

#[test]
fn compare_identical_manifests_succeeds_without_script() {
    let temp = TempDir::new().unwrap();
    let tree = temp.path().join("tree");
    write_tree(&tree, &[("a", "1"), ("b/c", "22")]);
    scan_into(temp.path(), &tree, "one.json");
    scan_into(temp.path(), &tree, "two.json");

    filelist_cmd(temp.path())
        .arg("compare")
        .arg("one.json")
        .arg("two.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("In both:          2"))
        .stdout(predicate::str::contains("Size differs").not());

    assert!(!temp.path().join("zip_different_files.py").exists());
}

#[test]
fn compare_scans_of_changed_tree() {
    let temp = TempDir::new().unwrap();
    let tree = temp.path().join("tree");
    write_tree(&tree, &[("keep.txt", "same"), ("gone.txt", "bye")]);
    scan_into(temp.path(), &tree, "before.json");

    fs::remove_file(tree.join("gone.txt")).unwrap();
    write_tree(&tree, &[("new/file.txt", "hello")]);
    scan_into(temp.path(), &tree, "after.json");

    filelist_cmd(temp.path())
        .arg("compare")
        .arg("before.json")
        .arg("after.json")
        .arg("--list")
        .arg("--no-script")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("A  gone.txt\n"))
        .stdout(predicate::str::contains("B  new/file.txt\n"));
}

#[test]
fn compare_rejects_malformed_manifest() {
    let temp = TempDir::new().unwrap();
    write_manifests(temp.path());
    fs::write(temp.path().join("broken.json"), "{ not json").unwrap();

    filelist_cmd(temp.path())
        .arg("compare")
        .arg("a.json")
        .arg("broken.json")
        .assert()
        .code(255)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Failed to load broken.json"))
        .stderr(predicate::str::contains("Invalid manifest"));
}

#[test]
fn compare_missing_manifest_fails() {
    let temp = TempDir::new().unwrap();
    write_manifests(temp.path());

    filelist_cmd(temp.path())
        .arg("compare")
        .arg("a.json")
        .arg("missing.json")
        .assert()
        .code(255)
        .stderr(predicate::str::contains("Failed to load missing.json"));
}

#[test]
fn compare_rejects_manifest_whose_sizes_overflow() {
    let temp = TempDir::new().unwrap();
    write_manifests(temp.path());
    fs::write(
        temp.path().join("huge.json"),
        r#"{"a": 18446744073709551615, "b": 1}"#,
    )
    .unwrap();

    filelist_cmd(temp.path())
        .arg("compare")
        .arg("a.json")
        .arg("huge.json")
        .assert()
        .code(255)
        .stderr(predicate::str::contains("Failed to load huge.json"))
        .stderr(predicate::str::contains("total size of all files exceeds"));
}
