//! The record under edit

use draftform_store::RecordKey;
use serde::{Deserialize, Serialize};

/// An editable record (here: an organization)
///
/// `id` is absent until the record is first persisted; the collection
/// assigns one on insert. Names are unique across the collection,
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Assigned by the collection on insert
    pub id: Option<u64>,
    /// Display name, unique case-insensitively
    pub name: String,
}

impl Record {
    /// New, not-yet-persisted record
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Record with a persisted id
    #[inline]
    #[must_use]
    pub fn with_id(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }

    /// Draft-store key component for this record's identity
    #[inline]
    #[must_use]
    pub fn record_key(&self) -> RecordKey {
        RecordKey::from_id(self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn record_key_follows_identity() {
        assert_eq!(Record::new("Acme").record_key(), RecordKey::New);
        assert_eq!(Record::with_id(2, "Acme").record_key(), RecordKey::Id(2));
    }

    #[test]
    fn serializes_as_draft_payload() {
        let record = Record::with_id(1, "Good Toys");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"Good Toys"}"#);
        assert_eq!(serde_json::from_str::<Record>(&json).unwrap(), record);
    }
}
