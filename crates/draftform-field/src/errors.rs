//! Per-field error-kind maps
//!
//! A field's validation state is a mapping from error kind to a truthy
//! payload. The field is valid iff the mapping is empty. Kinds are set and
//! cleared one key at a time, so an async check contributing the `api`
//! kind never disturbs a sibling kind such as `required`.

use indexmap::IndexMap;
use serde_json::Value;

/// Error kind contributed by the synchronous required check
pub const ERROR_KIND_REQUIRED: &str = "required";

/// Validation state of one field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationState {
    errors: IndexMap<String, Value>,
}

impl ValidationState {
    /// Empty (valid) state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Valid iff no error kind is present
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether `kind` is present
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.errors.contains_key(kind)
    }

    /// Payload stored under `kind`, if present
    #[inline]
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&Value> {
        self.errors.get(kind)
    }

    /// Error kinds currently present, in insertion order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Add, overwrite or remove exactly one error kind
    ///
    /// `Some(payload)` adds or overwrites `kind`; `None` removes it.
    /// Sibling kinds are untouched either way, and removing the last kind
    /// yields the empty (valid) state.
    pub fn set_error(&mut self, kind: &str, payload: Option<Value>) {
        match payload {
            Some(payload) => {
                self.errors.insert(kind.to_string(), payload);
            }
            None => {
                self.errors.shift_remove(kind);
            }
        }
    }
}
