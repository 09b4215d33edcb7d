//! The record collection
//!
//! An ordered sequence of records mutated only through insert/update/remove,
//! each of which preserves the case-insensitive name uniqueness invariant.
//! Insertion assigns a fresh id (max existing + 1, or 1 when empty).
//! Unknown or absent identity on update/remove is an explicit
//! `RecordNotFound`, never a silent no-op.

use crate::error::EditorError;
use crate::record::Record;
use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::watch;

/// Collection interface the editor depends on
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Current records, in insertion order
    async fn list(&self) -> Vec<Record>;

    /// Insert a record, assigning a fresh id
    ///
    /// # Errors
    /// - `EditorError::NameConflict` if the name is already in use
    async fn insert(&self, record: Record) -> Result<Record, EditorError>;

    /// Replace the record with the same id
    ///
    /// # Errors
    /// - `EditorError::RecordNotFound` if `record.id` is absent or unknown
    /// - `EditorError::NameConflict` if the new name collides with another record
    async fn update(&self, record: Record) -> Result<(), EditorError>;

    /// Remove a record by identity
    ///
    /// # Errors
    /// - `EditorError::RecordNotFound` if `record.id` is absent or unknown
    async fn remove(&self, record: &Record) -> Result<(), EditorError>;

    /// Whether any record other than `excluding_id` has a
    /// case-insensitively equal name
    async fn exists_with_name(&self, name: &str, excluding_id: Option<u64>) -> bool;
}

/// In-memory record collection
///
/// Stands in for a real backend. Every successful mutation is published on
/// a watch channel so a list view can refresh reactively.
#[derive(Debug)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<Record>>,
    updates: watch::Sender<Vec<Record>>,
}

impl MemoryRecordStore {
    /// Empty collection
    #[must_use]
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    /// Collection seeded with existing records
    #[must_use]
    pub fn seeded(records: Vec<Record>) -> Self {
        let (updates, _) = watch::channel(records.clone());
        Self {
            records: RwLock::new(records),
            updates,
        }
    }

    /// Observe the record list across mutations
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Record>> {
        self.updates.subscribe()
    }

    fn publish(&self, records: &[Record]) {
        // no observers is fine
        let _ = self.updates.send(records.to_vec());
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn name_taken(records: &[Record], name: &str, excluding_id: Option<u64>) -> bool {
    let candidate = name.to_lowercase();
    records.iter().any(|r| {
        let excluded = excluding_id.is_some() && r.id == excluding_id;
        !excluded && r.name.to_lowercase() == candidate
    })
}

fn next_id(records: &[Record]) -> u64 {
    records.iter().filter_map(|r| r.id).max().unwrap_or(0) + 1
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn list(&self) -> Vec<Record> {
        self.records.read().clone()
    }

    async fn insert(&self, record: Record) -> Result<Record, EditorError> {
        let mut records = self.records.write();

        if name_taken(&records, &record.name, None) {
            return Err(EditorError::NameConflict { name: record.name });
        }

        let record = Record {
            id: Some(next_id(&records)),
            name: record.name,
        };
        records.push(record.clone());

        tracing::info!(id = ?record.id, name = %record.name, "record inserted");
        self.publish(&records);
        Ok(record)
    }

    async fn update(&self, record: Record) -> Result<(), EditorError> {
        let mut records = self.records.write();

        let Some(id) = record.id else {
            return Err(EditorError::RecordNotFound { id: None });
        };
        // identity before names: an unknown id is not-found even when the
        // candidate name happens to be taken
        let Some(pos) = records.iter().position(|r| r.id == Some(id)) else {
            return Err(EditorError::RecordNotFound { id: Some(id) });
        };
        if name_taken(&records, &record.name, Some(id)) {
            return Err(EditorError::NameConflict { name: record.name });
        }

        records[pos] = record;
        tracing::info!(id, "record updated");
        self.publish(&records);
        Ok(())
    }

    async fn remove(&self, record: &Record) -> Result<(), EditorError> {
        let mut records = self.records.write();

        let Some(id) = record.id else {
            return Err(EditorError::RecordNotFound { id: None });
        };
        let Some(pos) = records.iter().position(|r| r.id == Some(id)) else {
            return Err(EditorError::RecordNotFound { id: Some(id) });
        };

        records.remove(pos);
        tracing::info!(id, "record removed");
        self.publish(&records);
        Ok(())
    }

    async fn exists_with_name(&self, name: &str, excluding_id: Option<u64>) -> bool {
        // one-tick async boundary, as a real backend would impose
        tokio::task::yield_now().await;
        name_taken(&self.records.read(), name, excluding_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seeded() -> MemoryRecordStore {
        MemoryRecordStore::seeded(vec![
            Record::with_id(1, "Good Toys"),
            Record::with_id(2, "Rapid Bikes"),
        ])
    }

    #[tokio::test]
    async fn insert_assigns_fresh_ids() {
        let store = MemoryRecordStore::new();

        let first = store.insert(Record::new("Alpha")).await.unwrap();
        assert_eq!(first.id, Some(1));

        let second = store.insert(Record::new("Beta")).await.unwrap();
        assert_eq!(second.id, Some(2));
    }

    #[tokio::test]
    async fn insert_continues_from_max_id() {
        let store = seeded();
        let inserted = store.insert(Record::new("Fast Cars")).await.unwrap();
        assert_eq!(inserted.id, Some(3));
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_name() {
        let store = seeded();
        let err = store.insert(Record::new("good toys")).await.unwrap_err();
        assert!(matches!(err, EditorError::NameConflict { .. }));
        assert_eq!(store.list().await.len(), 2);
    }

    #[tokio::test]
    async fn exists_with_name_is_case_insensitive() {
        let store = seeded();

        assert!(!store.exists_with_name("acme", None).await);
        assert!(store.exists_with_name("GOOD TOYS", None).await);
        // the record itself is excluded
        assert!(!store.exists_with_name("Good Toys", Some(1)).await);
        assert!(store.exists_with_name("Good Toys", Some(2)).await);
    }

    #[tokio::test]
    async fn update_replaces_matching_record() {
        let store = seeded();
        store
            .update(Record::with_id(2, "Rapid Bicycles"))
            .await
            .unwrap();

        let records = store.list().await;
        assert_eq!(records[1], Record::with_id(2, "Rapid Bicycles"));
    }

    #[tokio::test]
    async fn update_of_unknown_or_absent_id_is_reported() {
        let store = seeded();

        let err = store.update(Record::with_id(99, "X")).await.unwrap_err();
        assert!(matches!(
            err,
            EditorError::RecordNotFound { id: Some(99) }
        ));

        let err = store.update(Record::new("X")).await.unwrap_err();
        assert!(matches!(err, EditorError::RecordNotFound { id: None }));
    }

    #[tokio::test]
    async fn unknown_id_wins_over_taken_name() {
        let store = seeded();

        let err = store
            .update(Record::with_id(99, "Good Toys"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EditorError::RecordNotFound { id: Some(99) }
        ));
        assert_eq!(store.list().await.len(), 2);
    }

    #[tokio::test]
    async fn remove_deletes_by_identity() {
        let store = seeded();
        store.remove(&Record::with_id(1, "Good Toys")).await.unwrap();

        let records = store.list().await;
        assert_eq!(records, vec![Record::with_id(2, "Rapid Bikes")]);

        let err = store
            .remove(&Record::with_id(1, "Good Toys"))
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::RecordNotFound { id: Some(1) }));
    }

    #[tokio::test]
    async fn subscribers_observe_mutations() {
        let store = seeded();
        let mut updates = store.subscribe();

        store.insert(Record::new("Fast Cars")).await.unwrap();
        updates.changed().await.unwrap();
        assert_eq!(updates.borrow_and_update().len(), 3);

        store.remove(&Record::with_id(2, "Rapid Bikes")).await.unwrap();
        updates.changed().await.unwrap();
        assert_eq!(updates.borrow_and_update().len(), 2);
    }
}
