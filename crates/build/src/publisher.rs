use lesspress_core::Result;
use lesspress_utils::FileSystem;
use std::path::Path;
use tracing::info;

/// What [`ArtifactPublisher::write_or_delete`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishAction {
    Written,
    Deleted,
    /// Deletion requested but the file was already gone
    Unchanged,
}

/// Brings one artifact path in line with what the build wants there
pub struct ArtifactPublisher<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> ArtifactPublisher<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// Atomically replace `path` with `content`, or delete it when `content`
    /// is `None`
    pub fn write_or_delete(&self, path: &Path, content: Option<&str>) -> Result<PublishAction> {
        match content {
            Some(content) => {
                self.fs.write_atomic(path, content.as_bytes())?;
                info!("Wrote {} ({} bytes)", path.display(), content.len());
                Ok(PublishAction::Written)
            }
            None => {
                if self.fs.remove(path)? {
                    info!("Removed {}", path.display());
                    Ok(PublishAction::Deleted)
                } else {
                    Ok(PublishAction::Unchanged)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesspress_utils::{MemoryFileSystem, OsFileSystem};
    use tempfile::TempDir;

    #[test]
    fn test_write_then_delete() {
        let fs = MemoryFileSystem::new();
        let publisher = ArtifactPublisher::new(&fs);
        let path = Path::new("/t/css/template.css");

        assert_eq!(
            publisher.write_or_delete(path, Some("body{}")).unwrap(),
            PublishAction::Written
        );
        assert_eq!(fs.contents(path).as_deref(), Some("body{}"));

        assert_eq!(
            publisher.write_or_delete(path, None).unwrap(),
            PublishAction::Deleted
        );
        assert_eq!(
            publisher.write_or_delete(path, None).unwrap(),
            PublishAction::Unchanged
        );
        assert_eq!(fs.writes(), 1);
        assert_eq!(fs.removals(), 1);
    }

    #[test]
    fn test_on_disk_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let publisher = ArtifactPublisher::new(&OsFileSystem);
        let path = temp_dir.path().join("css").join("template.min.css");

        publisher.write_or_delete(&path, Some(".a{color:blue}")).unwrap();
        publisher.write_or_delete(&path, Some(".a{color:red}")).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), ".a{color:red}");
    }
}
