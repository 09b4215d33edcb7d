//! Draft-backed editing session
//!
//! Orchestrates one record's editing lifecycle: load with draft restore,
//! mirror every change into the draft store, validate the name against the
//! collection asynchronously, and commit on save (insert for a new record,
//! update for an existing one), clearing the draft and notifying observers.

use crate::checker::NameChecker;
use crate::collection::RecordStore;
use crate::error::EditorError;
use crate::record::Record;
use crate::state::{validate_transition, SessionState};
use draftform_field::{
    AsyncFieldValidator, CheckFuture, FieldChange, FieldHandle, ValidatorConfig, ValidatorGuard,
};
use draftform_store::{DraftKey, DraftStore, StorageScope};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const SAVED_CHANNEL_CAPACITY: usize = 16;

/// Editor configuration
#[derive(Debug, Clone)]
pub struct EditorConfig {
    root: String,
    module: String,
    scope: StorageScope,
    validator: ValidatorConfig,
}

impl EditorConfig {
    /// Defaults: root `draftform`, module `record`, session scope,
    /// default validator (350ms window, `api` error kind)
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: "draftform".to_string(),
            module: "record".to_string(),
            scope: StorageScope::Session,
            validator: ValidatorConfig::new(),
        }
    }

    /// Set the draft-key root namespace
    #[must_use]
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the draft-key logical module name
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Set the storage scope drafts live in
    #[must_use]
    pub fn with_scope(mut self, scope: StorageScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the validator configuration
    #[must_use]
    pub fn with_validator(mut self, validator: ValidatorConfig) -> Self {
        self.validator = validator;
        self
    }

    /// Draft key for a record under this configuration
    ///
    /// # Errors
    /// - `EditorError::Store` if the configured key components are invalid
    pub fn draft_key(&self, record: &Record) -> Result<DraftKey, EditorError> {
        Ok(DraftKey::new(
            self.root.clone(),
            self.module.clone(),
            record.record_key(),
        )?)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a save attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Record committed to the collection
    Saved(Record),
    /// Form invalid or name in use; nothing committed
    Blocked,
}

/// One record's editing session
///
/// Created via [`load`](Self::load). Dropping the session stops the draft
/// mirroring task and the validator; neither touches the draft store or
/// the field's error state afterwards.
pub struct EditorSession {
    original: Record,
    key: DraftKey,
    name: FieldHandle,
    store: Arc<dyn RecordStore>,
    drafts: Arc<DraftStore<Record>>,
    scope: StorageScope,
    error_kind: String,
    checker: NameChecker,
    state: Arc<Mutex<SessionState>>,
    // edits at or below this sequence number are not mirrored; discard
    // raises it so changes still buffered in the channel cannot recreate
    // the draft it just cleared
    discard_seq: Arc<AtomicU64>,
    saved_tx: broadcast::Sender<Record>,
    mirror: JoinHandle<()>,
    _validator: ValidatorGuard,
}

impl EditorSession {
    /// Open a session for `record`
    ///
    /// If the draft store holds an entry for the record's key, the form is
    /// populated from it; otherwise from `record`. A mirroring task then
    /// persists every field change as the current draft, and the async
    /// name validator is attached with the configured debounce window.
    ///
    /// # Errors
    /// - `EditorError::Store` if the configured draft key is invalid
    pub fn load(
        record: Record,
        store: Arc<dyn RecordStore>,
        drafts: Arc<DraftStore<Record>>,
        config: EditorConfig,
    ) -> Result<Self, EditorError> {
        let key = config.draft_key(&record)?;

        let restored = drafts.load(&key, config.scope);
        let from_draft = restored.is_some();
        let initial = restored.unwrap_or_else(|| record.clone());
        tracing::debug!(key = %key, from_draft, "editor session loading");

        let name = FieldHandle::new("name", initial.name).with_required();

        let state = Arc::new(Mutex::new(SessionState::Uninitialized));
        transition(&state, SessionState::Loaded)?;

        let checker = NameChecker::new(Arc::clone(&store));
        let id = record.id;

        let snapshot_field = name.clone();
        let snapshot = move || Record {
            id,
            name: snapshot_field.value(),
        };

        let check_checker = checker.clone();
        let check = move |snapshot: Record| -> CheckFuture {
            let checker = check_checker.clone();
            Box::pin(async move { checker.is_unique(&snapshot.name, snapshot.id).await })
        };

        let validator =
            AsyncFieldValidator::attach(name.clone(), snapshot, check, config.validator.clone());

        let discard_seq = Arc::new(AtomicU64::new(0));
        let mirror = tokio::spawn(mirror_changes(
            name.changes(),
            id,
            key.clone(),
            Arc::clone(&drafts),
            config.scope,
            Arc::clone(&state),
            Arc::clone(&discard_seq),
        ));

        let (saved_tx, _) = broadcast::channel(SAVED_CHANNEL_CAPACITY);

        Ok(Self {
            original: record,
            key,
            name,
            store,
            drafts,
            scope: config.scope,
            error_kind: config.validator.error_kind().to_string(),
            checker,
            state,
            discard_seq,
            saved_tx,
            mirror,
            _validator: validator,
        })
    }

    /// The editable name field
    #[inline]
    #[must_use]
    pub fn name_field(&self) -> &FieldHandle {
        &self.name
    }

    /// Record the session was opened with
    #[inline]
    #[must_use]
    pub fn original(&self) -> &Record {
        &self.original
    }

    /// Draft key addressing this session's draft slot
    #[inline]
    #[must_use]
    pub fn draft_key(&self) -> &DraftKey {
        &self.key
    }

    /// Current session state
    #[inline]
    #[must_use]
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// Current form snapshot
    #[must_use]
    pub fn snapshot(&self) -> Record {
        Record {
            id: self.original.id,
            name: self.name.value(),
        }
    }

    /// Whether the form currently passes all validation
    ///
    /// The save action should be enabled from this flag; `save` on an
    /// invalid form is a no-op.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.name.is_valid()
    }

    /// Observe successful saves (UI/list refresh trigger)
    #[must_use]
    pub fn saved_events(&self) -> broadcast::Receiver<Record> {
        self.saved_tx.subscribe()
    }

    /// Reset the form to the original record values and clear the draft
    ///
    /// # Errors
    /// - `EditorError::IllegalTransition` if the session is closed
    pub fn discard(&self) -> Result<(), EditorError> {
        // every edit published so far belongs to the discarded draft, even
        // ones the mirroring task has not consumed yet
        self.discard_seq.store(self.name.seq(), Ordering::SeqCst);
        self.name.reset(self.original.name.clone());
        // the async verdict belonged to the discarded value
        self.name.set_error(&self.error_kind, None);
        self.drafts.clear(&self.key, self.scope);

        let mut guard = self.state.lock();
        if *guard != SessionState::Loaded {
            validate_transition(*guard, SessionState::Loaded)?;
            *guard = SessionState::Loaded;
        }
        tracing::debug!(key = %self.key, "draft discarded");
        Ok(())
    }

    /// Commit the form to the collection if it is valid
    ///
    /// Blocked unless every field error kind is clear, and the uniqueness
    /// check is re-awaited before the commit so a verdict still in its
    /// debounce window can never let a conflicting record through. On
    /// success the draft is cleared, the session reaches `Saved` and the
    /// record is published to [`saved_events`](Self::saved_events)
    /// subscribers.
    ///
    /// # Errors
    /// - collection errors from the insert/update (a concurrent conflict
    ///   surfaces as `EditorError::NameConflict`)
    pub async fn save(&self) -> Result<SaveOutcome, EditorError> {
        if !self.name.is_valid() {
            tracing::debug!(key = %self.key, "save blocked, field errors present");
            return Ok(SaveOutcome::Blocked);
        }

        let snapshot = self.snapshot();
        if !self.checker.is_unique(&snapshot.name, snapshot.id).await {
            self.name.set_error(&self.error_kind, Some(json!(true)));
            tracing::debug!(name = %snapshot.name, "save blocked, name in use");
            return Ok(SaveOutcome::Blocked);
        }

        let saved = match snapshot.id {
            Some(_) => {
                self.store.update(snapshot.clone()).await?;
                snapshot
            }
            None => self.store.insert(snapshot).await?,
        };

        self.drafts.clear(&self.key, self.scope);
        transition(&self.state, SessionState::Saved)?;
        tracing::info!(id = ?saved.id, name = %saved.name, "record saved");

        // no observers is fine
        let _ = self.saved_tx.send(saved.clone());
        Ok(SaveOutcome::Saved(saved))
    }

    /// Close the session without saving
    ///
    /// # Errors
    /// - `EditorError::IllegalTransition` if already closed
    pub fn close(self) -> Result<(), EditorError> {
        transition(&self.state, SessionState::Discarded)
        // Drop stops the mirroring task and the validator
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        self.mirror.abort();
    }
}

/// Remove a record from the collection, discarding any persisted draft
/// for it first
///
/// # Errors
/// - `EditorError::RecordNotFound` if the record's id is absent or unknown
/// - `EditorError::Store` if the configured draft key is invalid
pub async fn remove_record(
    record: &Record,
    store: &Arc<dyn RecordStore>,
    drafts: &DraftStore<Record>,
    config: &EditorConfig,
) -> Result<(), EditorError> {
    let key = config.draft_key(record)?;
    if drafts.has_draft(&key, config.scope) {
        drafts.clear(&key, config.scope);
    }
    store.remove(record).await
}

fn transition(state: &Mutex<SessionState>, to: SessionState) -> Result<(), EditorError> {
    let mut guard = state.lock();
    validate_transition(*guard, to)?;
    *guard = to;
    Ok(())
}

async fn mirror_changes(
    mut changes: broadcast::Receiver<FieldChange>,
    id: Option<u64>,
    key: DraftKey,
    drafts: Arc<DraftStore<Record>>,
    scope: StorageScope,
    state: Arc<Mutex<SessionState>>,
    discard_seq: Arc<AtomicU64>,
) {
    loop {
        let change = match changes.recv().await {
            Ok(change) => change,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // newer edits are still in the channel; the draft converges
                tracing::warn!(skipped, key = %key, "draft mirror lagged behind edits");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };

        // edits a discard has already superseded must not come back as a
        // fresh draft
        if change.seq <= discard_seq.load(Ordering::SeqCst) {
            tracing::debug!(seq = change.seq, key = %key, "skipping discarded edit");
            continue;
        }

        step(&state, SessionState::Editing);
        let draft = Record {
            id,
            name: change.value,
        };
        if let Err(err) = drafts.save(&key, &draft, scope) {
            tracing::warn!(key = %key, error = %err, "draft write failed");
            continue;
        }
        step(&state, SessionState::Dirty);
    }
}

fn step(state: &Mutex<SessionState>, to: SessionState) {
    let mut guard = state.lock();
    match validate_transition(*guard, to) {
        Ok(()) => *guard = to,
        Err(err) => tracing::warn!(error = %err, "session transition skipped"),
    }
}
