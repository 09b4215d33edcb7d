//! Error types for the editor core

use crate::state::SessionState;
use draftform_store::StoreError;

/// Editor and collection errors
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Update/remove addressed a record the collection does not hold
    #[error("record not found (id: {id:?})")]
    RecordNotFound {
        /// Identity the operation carried, if any
        id: Option<u64>,
    },

    /// Mutation would break the case-insensitive name uniqueness invariant
    #[error("name `{name}` is already in use")]
    NameConflict {
        /// The conflicting name
        name: String,
    },

    /// Session state machine violation
    #[error("illegal session transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// State the session was in
        from: SessionState,
        /// State the transition targeted
        to: SessionState,
    },

    /// Draft store failure
    #[error("draft store error: {0}")]
    Store(#[from] StoreError),
}
