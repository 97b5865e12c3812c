//! Canonical relative paths used as manifest keys.
//!
//! A manifest key is the path of a file relative to the scan root, with
//! components joined by `/` on every platform and no leading `./`.

use std::path::{Component, Path, PathBuf};

const SEPARATOR: &str = "/";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PathError {
    #[error("{path} is not under {root}")]
    NotUnderRoot { path: PathBuf, root: PathBuf },
    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8(PathBuf),
    #[error("Unexpected component in relative path: {0}")]
    UnexpectedComponent(PathBuf),
}

/// Returns the manifest key of `file` relative to `root`.
///
/// `root` must be a strict ancestor of `file`. Both paths are expected to be
/// absolute (or at least to share the same prefix form); no filesystem access
/// happens here.
pub fn canonical_relative_path(file: &Path, root: &Path) -> Result<String, PathError> {
    let not_under_root = || PathError::NotUnderRoot {
        path: file.to_path_buf(),
        root: root.to_path_buf(),
    };

    let relative = file.strip_prefix(root).map_err(|_| not_under_root())?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part
                    .to_str()
                    .ok_or_else(|| PathError::NonUtf8(file.to_path_buf()))?;
                parts.push(part);
            }
            Component::CurDir => {}
            _ => return Err(PathError::UnexpectedComponent(file.to_path_buf())),
        }
    }

    if parts.is_empty() {
        return Err(not_under_root());
    }

    Ok(parts.join(SEPARATOR))
}
