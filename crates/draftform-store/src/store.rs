//! Typed draft store over scoped storage areas

use crate::area::{MemoryStorage, StorageArea, StorageScope};
use crate::error::StoreError;
use crate::key::DraftKey;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// Keyed draft store
///
/// Serializes draft values as JSON into one of two scoped storage areas and
/// tracks a "has a draft" flag per (scope, key), refreshed by every
/// save/load/clear. The flag is scoped: a draft saved to the session area
/// never reads as present in the durable one.
///
/// Malformed stored data fails open: `load` reports "no draft present"
/// instead of surfacing an error to the editing flow.
pub struct DraftStore<T> {
    session: Arc<dyn StorageArea>,
    durable: Arc<dyn StorageArea>,
    flags: DashMap<(StorageScope, String), bool>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> DraftStore<T> {
    /// Create a store over the given session- and durable-scoped areas
    #[must_use]
    pub fn new(session: Arc<dyn StorageArea>, durable: Arc<dyn StorageArea>) -> Self {
        Self {
            session,
            durable,
            flags: DashMap::new(),
            _marker: PhantomData,
        }
    }

    /// Create a store over two fresh in-memory areas
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(MemoryStorage::new()),
        )
    }

    fn area(&self, scope: StorageScope) -> &dyn StorageArea {
        match scope {
            StorageScope::Session => self.session.as_ref(),
            StorageScope::Durable => self.durable.as_ref(),
        }
    }
}

impl<T: Serialize + DeserializeOwned> DraftStore<T> {
    /// Persist a draft under `key`
    ///
    /// # Errors
    /// - `StoreError::Serialize` if the value cannot be serialized
    pub fn save(&self, key: &DraftKey, value: &T, scope: StorageScope) -> Result<(), StoreError> {
        let name = key.storage_name();
        let raw = serde_json::to_string(value)?;

        self.area(scope).set(&name, raw);
        tracing::debug!(key = %name, ?scope, "draft saved");
        self.flags.insert((scope, name), true);

        Ok(())
    }

    /// Load the draft stored under `key`, if any
    ///
    /// A stored value that fails to deserialize is treated as absent.
    pub fn load(&self, key: &DraftKey, scope: StorageScope) -> Option<T> {
        let name = key.storage_name();

        let value = self.area(scope).get(&name).and_then(|raw| {
            match serde_json::from_str(&raw) {
                Ok(value) => Some(value),
                Err(err) => {
                    tracing::warn!(
                        key = %name,
                        error = %err,
                        "stored draft is malformed, treating as absent"
                    );
                    None
                }
            }
        });

        self.flags.insert((scope, name), value.is_some());
        value
    }

    /// Remove the draft stored under `key`
    pub fn clear(&self, key: &DraftKey, scope: StorageScope) {
        let name = key.storage_name();

        self.area(scope).remove(&name);
        tracing::debug!(key = %name, ?scope, "draft cleared");
        self.flags.insert((scope, name), false);
    }

    /// Whether a draft is present under `key` in `scope`
    ///
    /// Answers from the flag maintained by save/load/clear; a (scope, key)
    /// pair never touched through this store reads the storage area
    /// directly.
    #[must_use]
    pub fn has_draft(&self, key: &DraftKey, scope: StorageScope) -> bool {
        let name = key.storage_name();

        match self.flags.get(&(scope, name.clone())) {
            Some(flag) => *flag,
            None => {
                let present = self.area(scope).get(&name).is_some();
                self.flags.insert((scope, name), present);
                present
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::RecordKey;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Draft {
        id: Option<u64>,
        name: String,
    }

    fn key(record: RecordKey) -> DraftKey {
        DraftKey::new("app", "organization", record).unwrap()
    }

    #[test]
    fn round_trip_and_clear() {
        let store: DraftStore<Draft> = DraftStore::in_memory();
        let key = key(RecordKey::Id(2));
        let draft = Draft {
            id: Some(2),
            name: "Rapid Bik".into(),
        };

        assert!(!store.has_draft(&key, StorageScope::Session));

        store.save(&key, &draft, StorageScope::Session).unwrap();
        assert!(store.has_draft(&key, StorageScope::Session));
        assert_eq!(store.load(&key, StorageScope::Session), Some(draft));

        store.clear(&key, StorageScope::Session);
        assert!(!store.has_draft(&key, StorageScope::Session));
        assert!(store.load(&key, StorageScope::Session).is_none());
    }

    #[test]
    fn scopes_are_independent() {
        let store: DraftStore<Draft> = DraftStore::in_memory();
        let key = key(RecordKey::New);
        let draft = Draft {
            id: None,
            name: "Acme".into(),
        };

        store.save(&key, &draft, StorageScope::Durable).unwrap();
        assert!(store.load(&key, StorageScope::Session).is_none());
        assert_eq!(store.load(&key, StorageScope::Durable), Some(draft));
    }

    #[test]
    fn presence_flags_are_scoped() {
        let store: DraftStore<Draft> = DraftStore::in_memory();
        let key = key(RecordKey::Id(2));
        let draft = Draft {
            id: Some(2),
            name: "Rapid Bik".into(),
        };

        store.save(&key, &draft, StorageScope::Session).unwrap();
        assert!(store.has_draft(&key, StorageScope::Session));
        assert!(!store.has_draft(&key, StorageScope::Durable));

        // a miss in one scope must not clobber the other scope's flag
        assert!(store.load(&key, StorageScope::Durable).is_none());
        assert!(store.has_draft(&key, StorageScope::Session));

        store.clear(&key, StorageScope::Durable);
        assert!(store.has_draft(&key, StorageScope::Session));
        assert_eq!(store.load(&key, StorageScope::Session), Some(draft));
    }

    #[test]
    fn overwrites_keep_latest() {
        let store: DraftStore<Draft> = DraftStore::in_memory();
        let key = key(RecordKey::New);

        for name in ["A", "Ac", "Acm", "Acme"] {
            let draft = Draft {
                id: None,
                name: name.into(),
            };
            store.save(&key, &draft, StorageScope::Session).unwrap();
        }

        let loaded = store.load(&key, StorageScope::Session).unwrap();
        assert_eq!(loaded.name, "Acme");
    }

    #[test]
    fn malformed_stored_data_reads_as_absent() {
        let session = Arc::new(MemoryStorage::new());
        let store: DraftStore<Draft> =
            DraftStore::new(session.clone(), Arc::new(MemoryStorage::new()));
        let key = key(RecordKey::Id(1));

        session.set(&key.storage_name(), "{not json".into());

        assert!(store.has_draft(&key, StorageScope::Session));
        assert!(store.load(&key, StorageScope::Session).is_none());
        // load refreshed the flag from the failed parse
        assert!(!store.has_draft(&key, StorageScope::Session));
    }

    #[test]
    fn distinct_records_use_distinct_slots() {
        let store: DraftStore<Draft> = DraftStore::in_memory();
        let new_key = key(RecordKey::New);
        let id_key = key(RecordKey::Id(1));

        let new_draft = Draft {
            id: None,
            name: "one".into(),
        };
        let id_draft = Draft {
            id: Some(1),
            name: "two".into(),
        };

        store.save(&new_key, &new_draft, StorageScope::Session).unwrap();
        store.save(&id_key, &id_draft, StorageScope::Session).unwrap();

        assert_eq!(store.load(&new_key, StorageScope::Session), Some(new_draft));
        assert_eq!(store.load(&id_key, StorageScope::Session), Some(id_draft));
    }
}
