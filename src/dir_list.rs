//! Non-recursive directory listing.
//!
//! Lists the immediate children of one directory together with the metadata
//! the scanner needs (the byte size of regular files). Problems with individual
//! children do not fail the listing; they are returned alongside the entries
//! so the caller can report them and move on.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum DirListError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
}

impl DirListError {
    fn from_io(e: std::io::Error, path: &Path) -> Self {
        if e.kind() == ErrorKind::PermissionDenied {
            DirListError::PermissionDenied(path.to_path_buf())
        } else {
            DirListError::Io(e)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file, or a symlink resolving to one (size is the target's).
    File { size: u64 },
    /// A directory to descend into. Symlinks to directories are never
    /// reported as this.
    Dir,
    /// Anything that is neither recorded nor traversed: symlinks to
    /// directories, sockets, FIFOs, device nodes.
    Ignored,
}

#[derive(Debug)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub error: DirListError,
}

#[derive(Debug, Default)]
pub struct DirListing {
    /// Sorted by path.
    pub entries: Vec<FsEntry>,
    pub skipped: Vec<SkippedEntry>,
}

/// Lists the immediate children of `dir`.
///
/// Fails only if `dir` itself cannot be read. Children whose metadata cannot be
/// queried (permission denied, deleted between listing and stat, dangling
/// symlinks) end up in `DirListing::skipped`.
pub fn list_directory(dir: &Path) -> Result<DirListing, DirListError> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| DirListError::from_io(e, dir))?;

    let mut listing = DirListing::default();

    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                listing.skipped.push(SkippedEntry {
                    path: dir.to_path_buf(),
                    error: DirListError::from_io(e, dir),
                });
                continue;
            }
        };
        let path = entry.path();

        match classify(&path) {
            Ok(kind) => listing.entries.push(FsEntry { path, kind }),
            Err(error) => listing.skipped.push(SkippedEntry { path, error }),
        }
    }

    listing.entries.sort_by(|a, b| a.path.cmp(&b.path));
    listing.skipped.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(listing)
}

fn classify(path: &Path) -> Result<EntryKind, DirListError> {
    let metadata = std::fs::symlink_metadata(path).map_err(|e| DirListError::from_io(e, path))?;
    let file_type = metadata.file_type();

    if file_type.is_symlink() {
        // Follow the link once to size regular-file targets. Directory targets
        // are not descended into, which keeps the walk free of cycles.
        let target = std::fs::metadata(path).map_err(|e| DirListError::from_io(e, path))?;
        if target.is_file() {
            return Ok(EntryKind::File { size: target.len() });
        }
        debug!("Not following symlink {}", path.display());
        return Ok(EntryKind::Ignored);
    }

    if file_type.is_dir() {
        Ok(EntryKind::Dir)
    } else if file_type.is_file() {
        Ok(EntryKind::File {
            size: metadata.len(),
        })
    } else {
        debug!("Ignoring special file {}", path.display());
        Ok(EntryKind::Ignored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(listing: &DirListing) -> Vec<String> {
        listing
            .entries
            .iter()
            .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_list_simple_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("file1.txt"), "content1").unwrap();
        fs::write(root.join("file2.txt"), "content22").unwrap();
        fs::create_dir(root.join("dir1")).unwrap();
        fs::write(root.join("dir1/file3.txt"), "content3").unwrap();

        let listing = list_directory(root).unwrap();

        assert_eq!(names(&listing), vec!["dir1", "file1.txt", "file2.txt"]);
        assert_eq!(listing.entries[0].kind, EntryKind::Dir);
        assert_eq!(listing.entries[1].kind, EntryKind::File { size: 8 });
        assert_eq!(listing.entries[2].kind, EntryKind::File { size: 9 });
        assert!(listing.skipped.is_empty());
    }

    #[test]
    fn test_list_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let listing = list_directory(temp_dir.path()).unwrap();

        assert!(listing.entries.is_empty());
        assert!(listing.skipped.is_empty());
    }

    #[test]
    fn test_list_missing_directory() {
        let temp_dir = TempDir::new().unwrap();

        let result = list_directory(&temp_dir.path().join("missing"));

        match result {
            Err(DirListError::Io(e)) => assert_eq!(e.kind(), ErrorKind::NotFound),
            other => panic!("Expected Io(NotFound) error, got {:?}", other),
        }
    }

    #[test]
    fn test_list_deterministic_ordering() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("zebra.txt"), "z").unwrap();
        fs::write(root.join("apple.txt"), "a").unwrap();
        fs::write(root.join("banana.txt"), "b").unwrap();

        let first = list_directory(root).unwrap();
        let second = list_directory(root).unwrap();

        assert_eq!(names(&first), vec!["apple.txt", "banana.txt", "zebra.txt"]);
        assert_eq!(first.entries, second.entries);
    }

    #[test]
    #[cfg(unix)]
    fn test_list_symlink_to_file_reports_target_size() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("target.txt"), "twelve bytes").unwrap();
        std::os::unix::fs::symlink(root.join("target.txt"), root.join("link.txt")).unwrap();

        let listing = list_directory(root).unwrap();

        assert_eq!(names(&listing), vec!["link.txt", "target.txt"]);
        assert_eq!(listing.entries[0].kind, EntryKind::File { size: 12 });
    }

    #[test]
    #[cfg(unix)]
    fn test_list_symlink_to_directory_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join("real")).unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("alias")).unwrap();

        let listing = list_directory(root).unwrap();

        assert_eq!(names(&listing), vec!["alias", "real"]);
        assert_eq!(listing.entries[0].kind, EntryKind::Ignored);
        assert_eq!(listing.entries[1].kind, EntryKind::Dir);
    }

    #[test]
    #[cfg(unix)]
    fn test_list_broken_symlink_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("fine.txt"), "ok").unwrap();
        std::os::unix::fs::symlink("/nonexistent/target", root.join("broken_link")).unwrap();

        let listing = list_directory(root).unwrap();

        assert_eq!(names(&listing), vec!["fine.txt"]);
        assert_eq!(listing.skipped.len(), 1);
        assert_eq!(listing.skipped[0].path, root.join("broken_link"));
    }

    #[test]
    #[cfg(unix)]
    fn test_list_permission_denied() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let restricted_dir = temp_dir.path().join("restricted");
        fs::create_dir(&restricted_dir).unwrap();

        let mut perms = fs::metadata(&restricted_dir).unwrap().permissions();
        perms.set_mode(0o000);
        fs::set_permissions(&restricted_dir, perms.clone()).unwrap();

        // Running as root bypasses permission checks entirely.
        let readable_anyway = fs::read_dir(&restricted_dir).is_ok();

        let result = list_directory(&restricted_dir);

        perms.set_mode(0o755);
        fs::set_permissions(&restricted_dir, perms).unwrap();

        if readable_anyway {
            return;
        }
        match result {
            Err(DirListError::PermissionDenied(path)) => assert_eq!(path, restricted_dir),
            other => panic!("Expected PermissionDenied error, got {:?}", other),
        }
    }
}
