//! Read-through cache for registry snapshots.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use tracing::debug;

use crate::error::Result;
use crate::models::registry::RegistryRecord;

/// Cache key: the registry's source identity plus its modification time.
/// A re-exported file with a newer timestamp is a different key, so stale
/// snapshots are never served.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryCacheKey {
    pub source: String,
    pub modified: SystemTime,
}

/// Caches loaded registry snapshots across pipeline runs.
///
/// Snapshots are immutable once loaded; callers share them through `Arc`.
#[derive(Default)]
pub struct RegistryCache {
    entries: RwLock<HashMap<RegistryCacheKey, Arc<Vec<RegistryRecord>>>>,
}

impl RegistryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot for `key`, loading it on a miss.
    ///
    /// Loading a newer version of a source evicts the older entries for
    /// that source.
    pub fn get_or_load<F>(&self, key: RegistryCacheKey, loader: F) -> Result<Arc<Vec<RegistryRecord>>>
    where
        F: FnOnce() -> Result<Vec<RegistryRecord>>,
    {
        if let Some(snapshot) = self.entries.read().unwrap().get(&key) {
            debug!(source = %key.source, "registry cache hit");
            return Ok(Arc::clone(snapshot));
        }

        let snapshot = Arc::new(loader()?);
        let mut entries = self.entries.write().unwrap();
        entries.retain(|existing, _| existing.source != key.source);
        entries.insert(key.clone(), Arc::clone(&snapshot));
        debug!(source = %key.source, records = snapshot.len(), "registry cache loaded");
        Ok(snapshot)
    }

    /// Number of cached snapshots.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
