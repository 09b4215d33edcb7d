//! Name uniqueness checking

use crate::collection::RecordStore;
use std::sync::Arc;

/// Async uniqueness check over the record collection
///
/// A pure read of collection state: `is_unique` is true iff no record
/// other than `excluding` has a case-insensitively equal name. Passing
/// `None` excludes nothing, so a new record is checked against the full
/// collection.
#[derive(Clone)]
pub struct NameChecker {
    store: Arc<dyn RecordStore>,
}

impl NameChecker {
    /// Create a checker over a collection
    #[inline]
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Whether `candidate` is free for the record identified by `excluding`
    pub async fn is_unique(&self, candidate: &str, excluding: Option<u64>) -> bool {
        !self.store.exists_with_name(candidate, excluding).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::MemoryRecordStore;
    use crate::record::Record;

    fn checker() -> NameChecker {
        NameChecker::new(Arc::new(MemoryRecordStore::seeded(vec![
            Record::with_id(1, "acme"),
            Record::with_id(2, "Rapid Bikes"),
        ])))
    }

    #[tokio::test]
    async fn conflict_with_other_record_fails() {
        // id 1 holds "acme"; checking on behalf of id 2 must see it
        assert!(!checker().is_unique("Acme", Some(2)).await);
    }

    #[tokio::test]
    async fn own_name_passes() {
        assert!(checker().is_unique("Acme", Some(1)).await);
    }

    #[tokio::test]
    async fn new_record_checks_full_collection() {
        let checker = checker();
        assert!(!checker.is_unique("ACME", None).await);
        assert!(checker.is_unique("Fresh Name", None).await);
    }
}
