//! Scoped storage areas
//!
//! The draft store only needs set/get/remove over string keys, in two
//! scopes: session-lifetime and durable. [`MemoryStorage`] is the
//! in-process stand-in used here; a browser shell would back the trait
//! with sessionStorage/localStorage, a desktop shell with files.

use dashmap::DashMap;

/// Which storage area a draft lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageScope {
    /// Cleared when the session ends
    #[default]
    Session,
    /// Survives restarts
    Durable,
}

/// Minimal scoped string key-value store
pub trait StorageArea: Send + Sync {
    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: String);

    /// Read the value under `key`
    fn get(&self, key: &str) -> Option<String>;

    /// Remove the value under `key`, if any
    fn remove(&self, key: &str);
}

/// In-memory storage area
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty storage area
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the area holds no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageArea for MemoryStorage {
    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.clone())
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}
