use crate::compare::{DiffResult, SharedEntry};
use crate::manifest::{Manifest, ManifestDocument};
use crate::manifest_file::LoadedManifest;
use crate::util::atomic_write::write_atomically;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

const REPORT_MODE: u32 = 0o644;

pub fn print_scan_summary(
    root: &Path,
    doc: &ManifestDocument,
    skipped: usize,
    saved_to: &Path,
) {
    println!("Scanned:    {}", root.display());
    println!("Files:      {}", doc.total_files());
    println!("Total size: {}", format_size(doc.total_size()));
    if skipped > 0 {
        println!("Skipped:    {}", skipped);
    }
    println!("Saved to:   {}", saved_to.display());
}

pub fn print_comparison(
    path_a: &Path,
    a: &LoadedManifest,
    path_b: &Path,
    b: &LoadedManifest,
    diff: &DiffResult,
) {
    print_manifest_header("A", path_a, a);
    println!();
    print_manifest_header("B", path_b, b);
    println!();

    for line in summary_lines(diff) {
        println!("{}", line);
    }
}

pub fn print_differing_paths(diff: &DiffResult) {
    for path in diff.only_in_a.keys() {
        println!("A  {}", path);
    }
    for path in diff.only_in_b.keys() {
        println!("B  {}", path);
    }
    for (path, entry) in diff.size_drift() {
        println!(
            "~  {} ({} -> {})",
            path,
            format_size(entry.size_a),
            format_size(entry.size_b)
        );
    }
}

fn print_manifest_header(label: &str, path: &Path, loaded: &LoadedManifest) {
    println!("List {}: {}", label, path.display());
    if let Some(source) = loaded.metadata.source_directory() {
        println!("  Source:      {}", source);
    }
    println!("  Total files: {}", loaded.manifest.file_count());
    println!(
        "  Total size:  {}",
        format_size(loaded.manifest.total_size())
    );
}

fn summary_lines(diff: &DiffResult) -> Vec<String> {
    let mut lines = vec![
        format!(
            "In both:   {:>8}  (A: {}, B: {})",
            diff.in_both.len(),
            format_size(diff.size_in_both_a()),
            format_size(diff.size_in_both_b())
        ),
        format!(
            "Only in A: {:>8}  ({})",
            diff.only_in_a.len(),
            format_size(diff.size_only_in_a())
        ),
        format!(
            "Only in B: {:>8}  ({})",
            diff.only_in_b.len(),
            format_size(diff.size_only_in_b())
        ),
    ];

    let drifted = diff.size_drift().count();
    if drifted > 0 {
        lines.push(format!("Size differs for {} shared files", drifted));
    }

    lines
}

/// Machine-readable record of one comparison.
#[derive(Debug, Serialize)]
pub struct ComparisonReport<'a> {
    file_a: String,
    file_b: String,
    summary: ReportSummary,
    files_only_in_a: &'a BTreeMap<String, u64>,
    files_only_in_b: &'a BTreeMap<String, u64>,
    files_in_both: &'a BTreeMap<String, SharedEntry>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct ReportSummary {
    total_in_a: usize,
    total_in_b: usize,
    in_both: usize,
    only_in_a: usize,
    only_in_b: usize,
    size_only_a: u64,
    size_only_b: u64,
    size_both_a: u64,
    size_both_b: u64,
}

impl<'a> ComparisonReport<'a> {
    pub fn new(
        path_a: &Path,
        a: &Manifest,
        path_b: &Path,
        b: &Manifest,
        diff: &'a DiffResult,
    ) -> Self {
        ComparisonReport {
            file_a: path_a.display().to_string(),
            file_b: path_b.display().to_string(),
            summary: ReportSummary {
                total_in_a: a.file_count(),
                total_in_b: b.file_count(),
                in_both: diff.in_both.len(),
                only_in_a: diff.only_in_a.len(),
                only_in_b: diff.only_in_b.len(),
                size_only_a: diff.size_only_in_a(),
                size_only_b: diff.size_only_in_b(),
                size_both_a: diff.size_in_both_a(),
                size_both_b: diff.size_in_both_b(),
            },
            files_only_in_a: &diff.only_in_a,
            files_only_in_b: &diff.only_in_b,
            files_in_both: &diff.in_both,
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        write_atomically(path, json.as_bytes(), REPORT_MODE)?;
        Ok(())
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    const GB: u64 = 1024 * 1024 * 1024;
    const TB: u64 = 1024 * 1024 * 1024 * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
