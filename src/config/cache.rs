//! Bounded cache of loaded configuration files.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use super::schema::GuardianConfig;

/// Default number of configuration files kept.
pub const DEFAULT_CAPACITY: usize = 64;

/// Loaded configurations keyed by path.
///
/// Entries are evicted oldest-first once `capacity` is reached.
#[derive(Debug)]
pub struct ConfigCache {
    entries: HashMap<PathBuf, GuardianConfig>,
    order: VecDeque<PathBuf>,
    capacity: usize,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A cache holding at most `capacity` entries. Zero disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    pub fn get(&self, path: &Path) -> Option<&GuardianConfig> {
        self.entries.get(path)
    }

    pub fn insert(&mut self, path: PathBuf, config: GuardianConfig) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.insert(path.clone(), config).is_some() {
            return;
        }
        self.order.push_back(path);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    /// Drop one entry. Returns whether it was cached.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.order.retain(|p| p != path);
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ConfigCache {
    fn default() -> Self {
        Self::new()
    }
}
