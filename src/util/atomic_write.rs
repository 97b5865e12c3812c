//! Atomic file replacement.

use std::io::Write;
use std::path::Path;

/// Write `content` to `path`, replacing any existing file.
///
/// Writes to a temporary file in the destination directory, fsyncs it, then
/// atomically renames it into place, so readers see either the old or the new
/// file and never a partial one. On Unix the file ends up with permission
/// bits `mode`.
pub(crate) fn write_atomically(path: &Path, content: &[u8], mode: u32) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp_file
            .as_file()
            .set_permissions(std::fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    temp_file.as_file().sync_all()?;
    temp_file.persist(path).map_err(|e| e.error)?;

    Ok(())
}
