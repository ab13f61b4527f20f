//! Atomic file replacement so readers never observe a half-written artifact

use lesspress_core::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `content` in one rename.
///
/// The staging file lives next to the target so the rename never crosses a
/// file system. On unix the parent directory is synced afterwards, making
/// the new directory entry durable along with the data.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .map_err(|e| Error::file_system(parent, "create parent directory", e))?;

    let mut staged = tempfile::Builder::new()
        .prefix(".lesspress-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::file_system(parent, "create staging file", e))?;
    fill(&mut staged, content)?;

    // A failed persist hands the staging file back; dropping it removes it
    staged
        .persist(path)
        .map_err(|e| Error::file_system(path, "rename staging file", e.error))?;

    sync_dir(parent)
}

fn fill(staged: &mut NamedTempFile, content: &[u8]) -> Result<()> {
    let path = staged.path().to_path_buf();
    let file = staged.as_file_mut();
    file.write_all(content)
        .and_then(|()| file.sync_all())
        .map_err(|e| Error::file_system(path, "write staging file", e))
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    fs::File::open(dir)
        .and_then(|d| d.sync_all())
        .map_err(|e| Error::file_system(dir, "sync directory", e))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn staging_leftovers(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".lesspress-"))
            .count()
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("css").join("template.min.css");

        write_atomic(&file_path, b".a{color:red}").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), ".a{color:red}");
    }

    #[test]
    fn test_overwrite_leaves_no_staging_files() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("template.css");

        fs::write(&file_path, "old").unwrap();
        write_atomic(&file_path, b"new").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "new");
        assert_eq!(staging_leftovers(temp_dir.path()), 0);
    }

    #[test]
    fn test_failed_rename_cleans_up_staging_file() {
        let temp_dir = TempDir::new().unwrap();
        // A directory in the way makes the rename fail
        let blocked = temp_dir.path().join("template.css");
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep"), "x").unwrap();

        let err = write_atomic(&blocked, b"body{}").unwrap_err();

        assert!(err.to_string().contains("rename staging file"));
        assert_eq!(staging_leftovers(temp_dir.path()), 0);
        assert!(blocked.join("keep").exists());
    }
}
