//! draftform core
//!
//! The record collection, the async name uniqueness check and the
//! draft-backed editor session tying both to the field layer:
//!
//! - **RecordStore / MemoryRecordStore**: ordered record collection with
//!   fresh-id insertion, explicit not-found reporting and a watch channel
//!   for reactive list views
//! - **NameChecker**: case-insensitive uniqueness with self-exclusion
//! - **EditorSession**: load with draft restore, change-stream draft
//!   mirroring, debounced async validation, validated save and discard
//!
//! # Example
//!
//! ```rust,ignore
//! use draftform_core::{EditorConfig, EditorSession, MemoryRecordStore, Record, SaveOutcome};
//! use draftform_store::DraftStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), draftform_core::EditorError> {
//! let store = Arc::new(MemoryRecordStore::seeded(vec![
//!     Record::with_id(1, "Good Toys"),
//!     Record::with_id(2, "Rapid Bikes"),
//! ]));
//! let drafts = Arc::new(DraftStore::in_memory());
//!
//! let session = EditorSession::load(
//!     Record::new(""),
//!     store,
//!     drafts,
//!     EditorConfig::new().with_module("organization"),
//! )?;
//!
//! session.name_field().set_value("Fast Cars");
//! // ... debounce elapses, validator passes ...
//! assert!(matches!(session.save().await?, SaveOutcome::Saved(_)));
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod checker;
pub mod collection;
pub mod error;
pub mod record;
pub mod session;
pub mod state;

// Re-exports for convenience
pub use checker::NameChecker;
pub use collection::{MemoryRecordStore, RecordStore};
pub use error::EditorError;
pub use record::Record;
pub use session::{remove_record, EditorConfig, EditorSession, SaveOutcome};
pub use state::{allowed_transitions, validate_transition, SessionState};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with draftform
    pub use crate::{
        EditorConfig, EditorError, EditorSession, MemoryRecordStore, Record, RecordStore,
        SaveOutcome, SessionState,
    };
    pub use draftform_field::{FieldHandle, ValidationState, ValidatorConfig};
    pub use draftform_store::{DraftKey, DraftStore, RecordKey, StorageScope};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
