//! File system capability injected into the build pipeline
//!
//! The orchestrator never reaches for `std::fs` directly. It is handed a
//! [`FileSystem`], which is [`OsFileSystem`] in production and
//! [`MemoryFileSystem`] in tests.

use crate::atomic_file::write_atomic;
use crate::file_stat::probe_file;
use lesspress_core::{Error, FileStat, Result};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// Narrow set of file operations the build needs
pub trait FileSystem: Send + Sync {
    /// Size and mtime of a regular file, `None` when it does not exist
    fn stat(&self, path: &Path) -> Option<FileStat>;

    fn exists(&self, path: &Path) -> bool {
        self.stat(path).is_some()
    }

    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace the file's content without exposing a partial write
    fn write_atomic(&self, path: &Path, content: &[u8]) -> Result<()>;

    /// Delete the file. Returns `false` when there was nothing to delete.
    fn remove(&self, path: &Path) -> Result<bool>;
}

/// The real file system
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn stat(&self, path: &Path) -> Option<FileStat> {
        probe_file(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| Error::file_system(path, "read", e))
    }

    fn write_atomic(&self, path: &Path, content: &[u8]) -> Result<()> {
        write_atomic(path, content)
    }

    fn remove(&self, path: &Path) -> Result<bool> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::file_system(path, "remove", e)),
        }
    }
}

#[derive(Debug, Clone)]
struct MemoryFile {
    content: Vec<u8>,
    modified: i64,
}

#[derive(Debug, Default)]
struct MemoryState {
    files: BTreeMap<PathBuf, MemoryFile>,
    clock: i64,
    writes: usize,
    removals: usize,
    failing: HashSet<PathBuf>,
}

impl MemoryState {
    fn tick(&mut self) -> i64 {
        self.clock += 1;
        self.clock
    }
}

/// In-memory file system with a logical clock for mtimes.
///
/// Every `write_atomic` and successful `remove` call through the
/// [`FileSystem`] trait is counted so tests can assert that a build performed
/// no effects. Seeding helpers (`insert`, `touch`) are not counted.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    state: Mutex<MemoryState>,
}

impl MemoryFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file, advancing the clock
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        let mut state = self.state.lock();
        let modified = state.tick();
        state.files.insert(
            path.into(),
            MemoryFile {
                content: content.into(),
                modified,
            },
        );
    }

    /// Bump a file's mtime without changing its content
    pub fn touch(&self, path: &Path) {
        let mut state = self.state.lock();
        let modified = state.tick();
        if let Some(file) = state.files.get_mut(path) {
            file.modified = modified;
        }
    }

    /// Delete a file behind the pipeline's back
    pub fn delete(&self, path: &Path) {
        self.state.lock().files.remove(path);
    }

    /// Make every later write to `path` fail with an I/O error
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.state.lock().failing.insert(path.into());
    }

    #[must_use]
    pub fn contents(&self, path: &Path) -> Option<String> {
        self.state
            .lock()
            .files
            .get(path)
            .map(|f| String::from_utf8_lossy(&f.content).into_owned())
    }

    /// Number of writes performed through the trait
    #[must_use]
    pub fn writes(&self) -> usize {
        self.state.lock().writes
    }

    /// Number of deletions performed through the trait
    #[must_use]
    pub fn removals(&self) -> usize {
        self.state.lock().removals
    }
}

impl FileSystem for MemoryFileSystem {
    fn stat(&self, path: &Path) -> Option<FileStat> {
        self.state.lock().files.get(path).map(|f| FileStat {
            size: f.content.len() as u64,
            modified: f.modified,
        })
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.contents(path).ok_or_else(|| {
            Error::file_system(
                path,
                "read",
                io::Error::new(io::ErrorKind::NotFound, "no such file"),
            )
        })
    }

    fn write_atomic(&self, path: &Path, content: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        if state.failing.contains(path) {
            return Err(Error::file_system(
                path,
                "atomic rename",
                io::Error::new(io::ErrorKind::PermissionDenied, "read-only file system"),
            ));
        }
        let modified = state.tick();
        state.writes += 1;
        state.files.insert(
            path.to_path_buf(),
            MemoryFile {
                content: content.to_vec(),
                modified,
            },
        );
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<bool> {
        let mut state = self.state.lock();
        if state.files.remove(path).is_some() {
            state.removals += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
