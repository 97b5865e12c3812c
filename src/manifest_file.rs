use crate::manifest::{Manifest, ManifestDocument};
use crate::util::atomic_write::write_atomically;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Top-level key holding the manifest in the wrapped document shape. Its
/// presence is what distinguishes a wrapped document from a legacy bare
/// path-to-size mapping.
const FILES_KEY: &str = "files";
const SOURCE_DIRECTORY_KEY: &str = "source_directory";
const TOTAL_FILES_KEY: &str = "total_files";
const TOTAL_SIZE_KEY: &str = "total_size";

const MANIFEST_MODE: u32 = 0o644;

#[derive(Debug, thiserror::Error)]
pub enum ManifestFileError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid manifest: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Failed to serialize manifest: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Invalid manifest: total size of all files exceeds {} bytes", u64::MAX)]
    SizeOverflow,
}

impl ManifestFileError {
    fn from_io(e: std::io::Error, path: &Path) -> Self {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ManifestFileError::PermissionDenied(path.to_path_buf())
        } else {
            ManifestFileError::Io(e)
        }
    }
}

/// On-disk layout of the wrapped shape. Field order is the output order.
#[derive(Serialize)]
struct WrappedDocument<'a> {
    source_directory: &'a str,
    total_files: usize,
    total_size: u64,
    files: &'a Manifest,
}

/// The two document shapes accepted on load, decided once by probing for the
/// reserved `files` key.
enum ManifestShape {
    Wrapped {
        files: Value,
        metadata: Map<String, Value>,
    },
    Legacy(Value),
}

impl ManifestShape {
    fn detect(value: Value) -> Self {
        match value {
            Value::Object(mut object) if object.contains_key(FILES_KEY) => {
                let files = object.remove(FILES_KEY).unwrap_or(Value::Null);
                ManifestShape::Wrapped {
                    files,
                    metadata: object,
                }
            }
            other => ManifestShape::Legacy(other),
        }
    }
}

/// Top-level fields of a loaded document other than the manifest itself.
///
/// Empty for legacy documents. Counts and sizes stored here are whatever the
/// file claimed; use the manifest for the real values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestMetadata(BTreeMap<String, Value>);

impl ManifestMetadata {
    pub fn source_directory(&self) -> Option<&str> {
        self.0.get(SOURCE_DIRECTORY_KEY).and_then(Value::as_str)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedManifest {
    pub manifest: Manifest,
    pub metadata: ManifestMetadata,
}

/// Serialize a document to pretty-printed JSON.
///
/// The count and size written out are recomputed from the manifest.
pub fn encode(doc: &ManifestDocument) -> Result<String, ManifestFileError> {
    let wrapped = WrappedDocument {
        source_directory: &doc.source_directory,
        total_files: doc.total_files(),
        total_size: doc.total_size(),
        files: &doc.manifest,
    };
    let mut json = serde_json::to_string_pretty(&wrapped).map_err(ManifestFileError::Encode)?;
    json.push('\n');
    Ok(json)
}

/// Parse a manifest document in either the wrapped or the legacy shape.
///
/// Either the whole document parses or an error is returned; there is no
/// partial result.
pub fn decode(content: &str) -> Result<LoadedManifest, ManifestFileError> {
    let value: Value = serde_json::from_str(content).map_err(ManifestFileError::Decode)?;

    match ManifestShape::detect(value) {
        ManifestShape::Wrapped { files, metadata } => {
            let manifest = manifest_from_value(files)?;
            warn_on_stale_totals(&manifest, &metadata);
            Ok(LoadedManifest {
                manifest,
                metadata: ManifestMetadata(metadata.into_iter().collect()),
            })
        }
        ManifestShape::Legacy(value) => {
            let manifest = manifest_from_value(value)?;
            Ok(LoadedManifest {
                manifest,
                metadata: ManifestMetadata::default(),
            })
        }
    }
}

/// Totals are summed in `u64` everywhere, so a manifest whose sizes add up to
/// more than that is rejected here.
fn manifest_from_value(value: Value) -> Result<Manifest, ManifestFileError> {
    let manifest: Manifest = serde_json::from_value(value).map_err(ManifestFileError::Decode)?;
    if manifest.checked_total_size().is_none() {
        return Err(ManifestFileError::SizeOverflow);
    }
    Ok(manifest)
}

fn warn_on_stale_totals(manifest: &Manifest, metadata: &Map<String, Value>) {
    if let Some(declared) = metadata.get(TOTAL_FILES_KEY).and_then(Value::as_u64)
        && declared != manifest.file_count() as u64
    {
        warn!(
            "Manifest declares {} files but lists {}; using the listed files",
            declared,
            manifest.file_count()
        );
    }
    if let Some(declared) = metadata.get(TOTAL_SIZE_KEY).and_then(Value::as_u64)
        && declared != manifest.total_size()
    {
        warn!(
            "Manifest declares a total size of {} bytes but its files add up to {}",
            declared,
            manifest.total_size()
        );
    }
}

/// Load a manifest document from the filesystem.
pub fn load(path: &Path) -> Result<LoadedManifest, ManifestFileError> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ManifestFileError::from_io(e, path))?;
    decode(&content)
}

/// Save a manifest document atomically, replacing any existing file.
pub fn save(doc: &ManifestDocument, path: &Path) -> Result<(), ManifestFileError> {
    let content = encode(doc)?;
    write_atomically(path, content.as_bytes(), MANIFEST_MODE)
        .map_err(|e| ManifestFileError::from_io(e, path))
}
