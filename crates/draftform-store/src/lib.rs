//! Keyed draft persistence
//!
//! Stores in-progress (unsaved) field values for a record under a composite
//! key, in either a session-scoped or a durable-scoped storage area. The
//! backing store is abstracted behind [`StorageArea`]; this crate ships an
//! in-memory implementation, but any scoped string key-value store with
//! set/get/remove works.
//!
//! # Example
//!
//! ```rust
//! use draftform_store::{DraftKey, DraftStore, RecordKey, StorageScope};
//!
//! let store: DraftStore<String> = DraftStore::in_memory();
//! let key = DraftKey::new("app", "organization", RecordKey::Id(2)).unwrap();
//!
//! store.save(&key, &"Rapid Bik".to_string(), StorageScope::Session).unwrap();
//! assert_eq!(store.load(&key, StorageScope::Session).as_deref(), Some("Rapid Bik"));
//!
//! store.clear(&key, StorageScope::Session);
//! assert!(store.load(&key, StorageScope::Session).is_none());
//! ```

#![warn(unreachable_pub)]

pub mod area;
pub mod error;
pub mod key;
pub mod store;

// Re-exports
pub use area::{MemoryStorage, StorageArea, StorageScope};
pub use error::StoreError;
pub use key::{DraftKey, RecordKey};
pub use store::DraftStore;
