//! Generation of standalone archive scripts.
//!
//! An archive script is a Python 3 program that carries a list of paths and,
//! when run on some host, zips whichever of those paths exist there. The path
//! list is embedded as JSON, zlib-compressed and base64-encoded, so the script
//! only needs the Python standard library and nothing from the environment
//! that generated it.

use crate::util::atomic_write::write_atomically;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_SCRIPT_FILENAME: &str = "zip_different_files.py";

/// Base64 line width inside the embedded literal.
const PAYLOAD_LINE_WIDTH: usize = 76;

const PAYLOAD_START: &str = "PAYLOAD = '''\n";
const PAYLOAD_END: &str = "'''";

const SCRIPT_MODE: u32 = 0o755;

const SCRIPT_HEAD: &str = r#"#!/usr/bin/env python3
"""
Compress a fixed list of files into a zip archive.

Run this from the directory the listed paths are relative to. Paths that do
not exist there are skipped.

Usage: python3 zip_different_files.py [ARCHIVE]   (default: diff_files.zip)
"""

import base64
import json
import sys
import zipfile
import zlib

"#;

const SCRIPT_TAIL: &str = r#"

def main():
    archive = sys.argv[1] if len(sys.argv) > 1 else 'diff_files.zip'
    data = base64.b64decode(''.join(PAYLOAD.split()))
    files = json.loads(zlib.decompress(data).decode('utf-8'))

    compressed = 0
    with zipfile.ZipFile(archive, 'w', zipfile.ZIP_DEFLATED) as zipf:
        for path in files:
            try:
                zipf.write(path)
            except FileNotFoundError:
                continue
            except OSError as e:
                print(f'Skipping {path}: {e.strerror}', file=sys.stderr)
                continue
            compressed += 1

    print(f'Compressed {compressed} of {len(files)} files into {archive}')


if __name__ == '__main__':
    main()
"#;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveScriptError {
    #[error("Failed to encode path list: {0}")]
    Encoding(#[source] std::io::Error),
    #[error("No embedded path list found")]
    MissingPayload,
    #[error("Embedded path list is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("Embedded path list is not valid zlib data: {0}")]
    InvalidCompression(#[source] std::io::Error),
    #[error("Embedded path list is not a JSON list of strings: {0}")]
    InvalidPathList(#[source] serde_json::Error),
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
}

impl ArchiveScriptError {
    fn from_io(e: std::io::Error, path: &Path) -> Self {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ArchiveScriptError::PermissionDenied(path.to_path_buf())
        } else {
            ArchiveScriptError::Io(e)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveScript {
    pub contents: String,
    pub suggested_filename: &'static str,
}

impl ArchiveScript {
    /// Write the script to `path`, replacing any existing file, and make it
    /// executable.
    pub fn save(&self, path: &Path) -> Result<(), ArchiveScriptError> {
        write_atomically(path, self.contents.as_bytes(), SCRIPT_MODE)
            .map_err(|e| ArchiveScriptError::from_io(e, path))
    }
}

/// Build an archive script for `paths`.
///
/// The paths are embedded exactly as given: order is kept and duplicates are
/// not removed.
pub fn generate(paths: &[String]) -> Result<ArchiveScript, ArchiveScriptError> {
    let payload = encode_payload(paths)?;
    debug!(
        "Encoded {} paths into {} bytes of payload",
        paths.len(),
        payload.len()
    );

    let mut contents = String::with_capacity(SCRIPT_HEAD.len() + payload.len() + 1024);
    contents.push_str(SCRIPT_HEAD);
    contents.push_str(PAYLOAD_START);
    for line in payload.as_bytes().chunks(PAYLOAD_LINE_WIDTH) {
        // Base64 output is ASCII, so every chunk is valid UTF-8.
        contents.push_str(&String::from_utf8_lossy(line));
        contents.push('\n');
    }
    contents.push_str(PAYLOAD_END);
    contents.push('\n');
    contents.push_str(SCRIPT_TAIL);

    Ok(ArchiveScript {
        contents,
        suggested_filename: DEFAULT_SCRIPT_FILENAME,
    })
}

/// Recover the path list embedded in a generated script.
pub fn decode_embedded_payload(script: &str) -> Result<Vec<String>, ArchiveScriptError> {
    let start = script
        .find(PAYLOAD_START)
        .ok_or(ArchiveScriptError::MissingPayload)?
        + PAYLOAD_START.len();
    let rest = &script[start..];
    let end = rest
        .find(PAYLOAD_END)
        .ok_or(ArchiveScriptError::MissingPayload)?;

    let encoded: String = rest[..end].split_whitespace().collect();
    let compressed = STANDARD.decode(encoded)?;

    let mut json = String::new();
    ZlibDecoder::new(compressed.as_slice())
        .read_to_string(&mut json)
        .map_err(ArchiveScriptError::InvalidCompression)?;

    serde_json::from_str(&json).map_err(ArchiveScriptError::InvalidPathList)
}

/// Load a script from disk and recover its embedded path list.
pub fn load_embedded_paths(path: &Path) -> Result<Vec<String>, ArchiveScriptError> {
    let script =
        std::fs::read_to_string(path).map_err(|e| ArchiveScriptError::from_io(e, path))?;
    decode_embedded_payload(&script)
}

fn encode_payload(paths: &[String]) -> Result<String, ArchiveScriptError> {
    let json = serde_json::to_vec(paths).map_err(|e| ArchiveScriptError::Encoding(e.into()))?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .map_err(ArchiveScriptError::Encoding)?;
    let compressed = encoder.finish().map_err(ArchiveScriptError::Encoding)?;

    Ok(STANDARD.encode(compressed))
}
