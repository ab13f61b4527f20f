use lesspress_core::{Error, Result};
use lesspress_utils::atomic_file::write_atomic;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Minimal key/value cache. Entries never expire on their own.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the value under `key` as a whole
    fn store(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Drop the value under `key`, a no-op when absent
    fn remove(&self, key: &str) -> Result<()>;
}

/// Cache persisted as one file per key under `<root>/<group>/`
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    dir: PathBuf,
}

impl DirectoryCache {
    pub fn new(root: &Path, group: &str) -> Self {
        Self {
            dir: root.join(group),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl CacheStore for DirectoryCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.entry_path(key);
        // Read directly rather than checking existence first
        match fs::read(&path) {
            Ok(bytes) => {
                debug!("Cache hit, reading {key} from {}", path.display());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Cache miss, {key} does not exist at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(Error::file_system(path, "read cache entry", e)),
        }
    }

    fn store(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.entry_path(key);
        trace!("Writing cache entry {key} to {}", path.display());
        write_atomic(&path, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::file_system(path, "remove cache entry", e)),
        }
    }
}

/// Process-local cache, counting stores for effect assertions in tests
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    stores: Mutex<usize>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `store` calls so far
    pub fn stores(&self) -> usize {
        *self.stores.lock()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn store(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_vec());
        *self.stores.lock() += 1;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
