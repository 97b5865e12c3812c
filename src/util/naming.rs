//! Default output file names.

use sha2::{Digest, Sha256};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

const MANIFEST_PREFIX: &str = "filelist";
const MANIFEST_EXTENSION: &str = ".json";
const ROOT_DIGEST_LEN: usize = 8;

/// Suggests a manifest file name for a scan of `root`.
///
/// The name carries a short digest of the root path, so manifests of the same
/// directory share a prefix, and a timestamp so that repeated scans do not
/// overwrite each other: `filelist_<digest>_<YYYYmmddHHMMSS>.json`.
pub fn default_manifest_filename(root: &Path) -> String {
    let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    format!(
        "{}_{}_{}{}",
        MANIFEST_PREFIX,
        root_digest(root),
        timestamp,
        MANIFEST_EXTENSION
    )
}

/// Appends `.json` to `path` unless it already has that extension.
///
/// Works on the raw `OsString`, so names that are not valid UTF-8 are kept
/// byte for byte.
pub fn with_manifest_extension(path: PathBuf) -> PathBuf {
    if path.extension() == Some(OsStr::new(&MANIFEST_EXTENSION[1..])) {
        return path;
    }
    let mut name = path.into_os_string();
    name.push(MANIFEST_EXTENSION);
    PathBuf::from(name)
}

fn root_digest(root: &Path) -> String {
    let mut hasher = Sha256::new();
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        hasher.update(root.as_os_str().as_bytes());
    }
    #[cfg(not(unix))]
    {
        hasher.update(root.to_string_lossy().as_bytes());
    }
    let digest = format!("{:x}", hasher.finalize());
    digest[..ROOT_DIGEST_LEN].to_string()
}
