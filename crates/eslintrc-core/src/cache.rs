//! Per-directory memoization of resolved configuration arrays
//!
//! The cache is owned by one resolver instance and never shared between
//! instances. Entries are only dropped by an explicit [`ConfigCache::clear`];
//! file-system changes never invalidate it automatically.

use crate::config::ConfigArray;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Memoized `directory -> ConfigArray` entries
#[derive(Debug, Default)]
pub struct ConfigCache {
    entries: DashMap<PathBuf, Arc<ConfigArray>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the cached array for a directory
    pub fn get(&self, directory: &Path) -> Option<Arc<ConfigArray>> {
        self.entries.get(directory).map(|entry| entry.value().clone())
    }

    /// Memoize the array for a directory, returning the stored handle
    pub fn put(&self, directory: PathBuf, array: Arc<ConfigArray>) -> Arc<ConfigArray> {
        self.entries.insert(directory, Arc::clone(&array));
        array
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
