use assert_cmd::{Command, cargo::cargo_bin_cmd};
use std::fs;
use std::path::Path;

pub fn filelist_cmd(cwd: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("filelist");
    cmd.arg("-C").arg(cwd);
    cmd
}

/// Scans `tree` into `output` (relative to `cwd`) and asserts success.
#[allow(dead_code)]
pub fn scan_into(cwd: &Path, tree: &Path, output: &str) {
    filelist_cmd(cwd)
        .arg("scan")
        .arg(tree)
        .arg("-o")
        .arg(output)
        .assert()
        .success();
}

/// Creates `files` (relative path, contents) below `root`.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (path, contents) in files {
        let path = root.join(path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}

// Only the compare and script tests need to read manifests back.
#[allow(dead_code)]
pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}
