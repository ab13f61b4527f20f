use crate::store::CacheStore;
use lesspress_core::{Error, MetadataSnapshot, Result, CACHE_KEY};
use tracing::{debug, warn};

/// Where the snapshot of the last successful compile lives
pub trait MetadataStore: Send + Sync {
    /// The current snapshot, `None` when nothing has been compiled since the
    /// cache was last cleared
    fn load(&self) -> Result<Option<MetadataSnapshot>>;

    /// Replace the current snapshot as a whole
    fn store(&self, snapshot: &MetadataSnapshot) -> Result<()>;

    fn clear(&self) -> Result<()>;
}

/// [`MetadataStore`] keeping the snapshot as JSON under one fixed cache key
#[derive(Debug)]
pub struct CachedMetadataStore<C> {
    cache: C,
    key: String,
}

impl<C: CacheStore> CachedMetadataStore<C> {
    pub fn new(cache: C) -> Self {
        Self::with_key(cache, CACHE_KEY)
    }

    pub fn with_key(cache: C, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<C: CacheStore> MetadataStore for CachedMetadataStore<C> {
    fn load(&self) -> Result<Option<MetadataSnapshot>> {
        let Some(bytes) = self.cache.get(&self.key)? else {
            return Ok(None);
        };

        match serde_json::from_slice::<MetadataSnapshot>(&bytes) {
            Ok(snapshot) => {
                debug!("Loaded metadata for {} tracked files", snapshot.len());
                Ok(Some(snapshot))
            }
            Err(e) => {
                // An unreadable entry is as good as none: the next compile rewrites it
                warn!("Ignoring corrupt metadata cache entry '{}': {e}", self.key);
                Ok(None)
            }
        }
    }

    fn store(&self, snapshot: &MetadataSnapshot) -> Result<()> {
        let content = serde_json::to_vec_pretty(snapshot).map_err(|e| Error::Json {
            message: "Failed to serialize metadata snapshot".to_string(),
            source: e,
        })?;
        self.cache.store(&self.key, &content)?;
        debug!("Stored metadata for {} tracked files", snapshot.len());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.cache.remove(&self.key)
    }
}
