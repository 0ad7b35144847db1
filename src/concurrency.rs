//! Per-target single-writer locks
//!
//! Targets are exported concurrently, one thread each. A target's read-merge-write cycle
//! holds the write lock for its output path for the whole cycle, so two operations against
//! the same file serialize while different files proceed independently. Keys are folded
//! lexically, so `out/a.json` and `./out/a.json` share one lock.

use crate::store::normalize_path;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Lock registry keyed by output path.
pub struct TargetLockManager {
    locks: Arc<RwLock<HashMap<PathBuf, Arc<RwLock<()>>>>>,
}

impl TargetLockManager {
    pub fn new() -> Self {
        Self {
            locks: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get or create the lock for `target`.
    pub fn get_lock(&self, target: &Path) -> Arc<RwLock<()>> {
        let key = normalize_path(target);
        {
            let map = self.locks.read();
            if let Some(lock) = map.get(&key) {
                return lock.clone();
            }
        }

        // Another thread may have inserted between the two lookups.
        let mut map = self.locks.write();
        map.entry(key)
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }

    /// Run `f` while holding the write lock for `target`.
    ///
    /// The entry is dropped again once no other caller holds or waits on it.
    pub fn with_target<T>(&self, target: &Path, f: impl FnOnce() -> T) -> T {
        let lock = self.get_lock(target);
        let result = {
            let _guard = lock.write();
            f()
        };
        drop(lock);
        self.prune(target);
        result
    }

    fn prune(&self, target: &Path) {
        let key = normalize_path(target);
        let mut map = self.locks.write();
        if map.get(&key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            map.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TargetLockManager {
    fn default() -> Self {
        Self::new()
    }
}
