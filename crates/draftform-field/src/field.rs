//! Shared field handles with change streams

use crate::errors::{ValidationState, ERROR_KIND_REQUIRED};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// One published value change
///
/// `seq` increases by one per `set_value`, so a consumer can tell whether
/// a buffered change predates some cutoff (a discard, a teardown) even
/// when it is delivered afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// Position of this change in the field's edit sequence
    pub seq: u64,
    /// The new value
    pub value: String,
}

#[derive(Debug)]
struct FieldInner {
    name: String,
    state: Mutex<FieldState>,
    changes: broadcast::Sender<FieldChange>,
}

#[derive(Debug)]
struct FieldState {
    value: String,
    seq: u64,
    errors: ValidationState,
    required: bool,
}

/// Handle to one editable field
///
/// Cheap to clone; all clones share the same value, error map and change
/// stream. Every `set_value` is published to subscribers obtained through
/// [`changes`](Self::changes).
#[derive(Debug, Clone)]
pub struct FieldHandle {
    inner: Arc<FieldInner>,
}

impl FieldHandle {
    /// Create a field with an initial value
    #[must_use]
    pub fn new(name: impl Into<String>, initial: impl Into<String>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(FieldInner {
                name: name.into(),
                state: Mutex::new(FieldState {
                    value: initial.into(),
                    seq: 0,
                    errors: ValidationState::new(),
                    required: false,
                }),
                changes,
            }),
        }
    }

    /// Mark the field required
    ///
    /// An empty value then carries the `required` error kind; the check is
    /// applied immediately and on every subsequent `set_value`.
    #[must_use]
    pub fn with_required(self) -> Self {
        {
            let mut state = self.inner.state.lock();
            state.required = true;
            apply_required(&mut state);
        }
        self
    }

    /// Field name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Current value
    #[inline]
    #[must_use]
    pub fn value(&self) -> String {
        self.inner.state.lock().value.clone()
    }

    /// Sequence number of the latest published change
    ///
    /// Starts at 0 for a freshly created field; `set_value` increments it
    /// before publishing.
    #[inline]
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.inner.state.lock().seq
    }

    /// Set the value, re-run the required check and publish the change
    pub fn set_value(&self, value: impl Into<String>) {
        let value = value.into();
        let seq = {
            let mut state = self.inner.state.lock();
            state.value = value.clone();
            state.seq += 1;
            apply_required(&mut state);
            state.seq
        };
        // no subscribers is fine
        let _ = self.inner.changes.send(FieldChange { seq, value });
    }

    /// Replace the value without publishing a change
    ///
    /// Re-runs the required check but bypasses the change stream. Used by
    /// discard/teardown paths, where mirroring the reset as an edit would
    /// immediately recreate the draft being cleared.
    pub fn reset(&self, value: impl Into<String>) {
        let mut state = self.inner.state.lock();
        state.value = value.into();
        apply_required(&mut state);
    }

    /// Subscribe to value changes
    #[must_use]
    pub fn changes(&self) -> broadcast::Receiver<FieldChange> {
        self.inner.changes.subscribe()
    }

    /// Snapshot of the error-kind map
    #[must_use]
    pub fn errors(&self) -> ValidationState {
        self.inner.state.lock().errors.clone()
    }

    /// Add, overwrite or remove one error kind
    pub fn set_error(&self, kind: &str, payload: Option<Value>) {
        self.inner.state.lock().errors.set_error(kind, payload);
    }

    /// Valid iff the error-kind map is empty
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.inner.state.lock().errors.is_valid()
    }
}

fn apply_required(state: &mut FieldState) {
    if !state.required {
        return;
    }
    let payload = if state.value.is_empty() {
        Some(json!(true))
    } else {
        None
    };
    state.errors.set_error(ERROR_KIND_REQUIRED, payload);
}
