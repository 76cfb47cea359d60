use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::Result;
use crate::rewrite::Entry;

pub const PLAYLIST_HEADER: &str = "#EXTM3U";
pub const UPDATED_COMMENT: &str = "# Updated By m3u-regroup";
pub const NO_MATCHES_COMMENT: &str = "# No matching channels found";

/// Render the output playlist.
pub fn render_playlist(entries: &[Entry]) -> String {
    let mut out = String::new();
    out.push_str(PLAYLIST_HEADER);
    out.push('\n');

    if entries.is_empty() {
        out.push_str(NO_MATCHES_COMMENT);
        out.push('\n');
        return out;
    }

    out.push_str(UPDATED_COMMENT);
    out.push_str("\n\n");
    for entry in entries {
        out.push_str(&entry.extinf);
        out.push('\n');
        out.push_str(&entry.url);
        out.push('\n');
    }
    out
}

/// Write the playlist to `path`, replacing any previous file, and open its
/// permissions to read/write for everyone.
///
/// The content goes to a temporary file in the same directory first, so a
/// failed write leaves the previous output untouched.
pub fn write_playlist(path: &Path, entries: &[Entry]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(render_playlist(entries).as_bytes())?;
    file.flush()?;
    file.persist(path).map_err(|e| e.error)?;

    set_shared_permissions(path)?;
    Ok(())
}

#[cfg(unix)]
fn set_shared_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o666))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_shared_permissions(path: &Path) -> Result<()> {
    let mut permissions = std::fs::metadata(path)?.permissions();
    permissions.set_readonly(false);
    std::fs::set_permissions(path, permissions)?;
    Ok(())
}
