//! Error types for the draft store

/// Draft store errors
///
/// Note that malformed *stored* data is deliberately not an error: loads
/// fail open and report "no draft present" so a corrupt entry can never
/// break the editing flow.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Key components were rejected
    #[error("invalid draft key: {0}")]
    InvalidKey(String),

    /// Draft value could not be serialized
    #[error("draft serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
