use crate::dir_list::{DirListError, EntryKind, list_directory};
use crate::manifest::Manifest;
use crate::rel_path::canonical_relative_path;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Directory not found: {0}")]
    NotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("IO error: {0}")]
    Io(std::io::Error),
}

/// A file or directory that was left out of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug)]
pub struct ScanResult {
    /// Canonicalized scan root.
    pub root: PathBuf,
    pub manifest: Manifest,
    /// Sorted by path.
    pub warnings: Vec<ScanWarning>,
}

/// Build a manifest of every regular file below `root`.
///
/// Recursively lists `root`, recording each regular file (and each symlink
/// that resolves to one) under its canonical relative path with its size in
/// bytes. Directories are descended into but not recorded; symlinked
/// directories are not descended into.
///
/// # Errors
///
/// Only problems with `root` itself are fatal:
/// * `NotFound` if `root` does not exist
/// * `NotADirectory` if `root` is not a directory
/// * `PermissionDenied` if `root` cannot be listed
///
/// Anything that goes wrong below the root (unreadable subdirectories, files
/// deleted mid-scan, names that are not valid UTF-8) is logged, recorded in
/// `ScanResult::warnings`, and the entry is omitted from the manifest.
pub fn scan(root: &Path) -> Result<ScanResult, ScanError> {
    let root = root.canonicalize().map_err(|e| match e.kind() {
        ErrorKind::NotFound => ScanError::NotFound(root.to_path_buf()),
        ErrorKind::PermissionDenied => ScanError::PermissionDenied(root.to_path_buf()),
        _ => ScanError::Io(e),
    })?;

    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root));
    }

    info!("Scanning {}", root.display());

    let mut manifest = Manifest::new();
    let mut warnings = Vec::new();

    let listing = list_directory(&root).map_err(|e| match e {
        DirListError::PermissionDenied(path) => ScanError::PermissionDenied(path),
        DirListError::Io(e) => ScanError::Io(e),
    })?;
    let mut pending = vec![listing];

    while let Some(listing) = pending.pop() {
        for skipped in listing.skipped {
            record_warning(&mut warnings, skipped.path, skipped.error.to_string());
        }

        for entry in listing.entries {
            match entry.kind {
                EntryKind::File { size } => match canonical_relative_path(&entry.path, &root) {
                    Ok(key) => {
                        debug!("{} ({} bytes)", key, size);
                        manifest.insert(key, size);
                    }
                    Err(e) => record_warning(&mut warnings, entry.path, e.to_string()),
                },
                EntryKind::Dir => match list_directory(&entry.path) {
                    Ok(child) => pending.push(child),
                    Err(e) => record_warning(&mut warnings, entry.path, e.to_string()),
                },
                EntryKind::Ignored => {}
            }
        }
    }

    warnings.sort_by(|a, b| a.path.cmp(&b.path));

    info!(
        "Scanned {} files ({} bytes) in {}",
        manifest.file_count(),
        manifest.total_size(),
        root.display()
    );

    Ok(ScanResult {
        root,
        manifest,
        warnings,
    })
}

fn record_warning(warnings: &mut Vec<ScanWarning>, path: PathBuf, reason: String) {
    warn!("Could not access {}: {}", path.display(), reason);
    warnings.push(ScanWarning { path, reason });
}
