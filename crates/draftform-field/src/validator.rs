//! Debounced asynchronous field validation
//!
//! Wires a field's change stream to an async check. Bursts are collapsed
//! by a debounce window, values equal to the previous one are suppressed,
//! and a generation counter guarantees that a slow in-flight check can
//! never overwrite the result of a fresher one.

use crate::debounce::Debounced;
use crate::field::FieldHandle;
use futures::future::BoxFuture;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default debounce window
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

/// Default error kind contributed by the async check
pub const DEFAULT_ERROR_KIND: &str = "api";

/// Boxed future resolved by a check callback
///
/// Resolves to `true` when the candidate passes (no error).
pub type CheckFuture = BoxFuture<'static, bool>;

/// Validator configuration
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    debounce: Duration,
    error_kind: String,
}

impl ValidatorConfig {
    /// Default configuration: 350ms window, `api` error kind
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            error_kind: DEFAULT_ERROR_KIND.to_string(),
        }
    }

    /// Set the debounce window
    #[inline]
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the error kind the check contributes
    #[inline]
    #[must_use]
    pub fn with_error_kind(mut self, error_kind: impl Into<String>) -> Self {
        self.error_kind = error_kind.into();
        self
    }

    /// Debounce window
    #[inline]
    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Error kind the check contributes
    #[inline]
    #[must_use]
    pub fn error_kind(&self) -> &str {
        &self.error_kind
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Debounced async validator for one field
pub struct AsyncFieldValidator;

impl AsyncFieldValidator {
    /// Attach a validator to a field
    ///
    /// On attach, a non-empty current value is checked immediately without
    /// waiting for a change event. Thereafter each debounced, distinct
    /// value either clears the error kind (empty value, no check issued)
    /// or is checked via `check(snapshot())`; the boolean result sets or
    /// clears the configured error kind, leaving sibling kinds intact.
    ///
    /// The returned guard detaches the validator when dropped; no error
    /// state is mutated after detach, including by checks still in flight.
    pub fn attach<Snap, P, C>(
        field: FieldHandle,
        snapshot: P,
        check: C,
        config: ValidatorConfig,
    ) -> ValidatorGuard
    where
        Snap: Send + 'static,
        P: Fn() -> Snap + Send + Sync + 'static,
        C: Fn(Snap) -> CheckFuture + Send + Sync + 'static,
    {
        let active = Arc::new(AtomicBool::new(true));
        let handle = tokio::spawn(run(
            field,
            snapshot,
            Arc::new(check),
            config,
            Arc::clone(&active),
        ));

        ValidatorGuard { handle, active }
    }
}

async fn run<Snap, P, C>(
    field: FieldHandle,
    snapshot: P,
    check: Arc<C>,
    config: ValidatorConfig,
    active: Arc<AtomicBool>,
) where
    Snap: Send + 'static,
    P: Fn() -> Snap + Send + Sync + 'static,
    C: Fn(Snap) -> CheckFuture + Send + Sync + 'static,
{
    let generation = Arc::new(AtomicU64::new(0));

    // subscribe before the initial check so edits racing it are not lost
    let changes = field.changes();

    let initial = field.value();
    if !initial.is_empty() {
        issue_check(&field, &snapshot, &check, &config, &active, &generation);
    }
    let mut last_seen = initial;

    let mut stream = Debounced::new(changes, config.debounce);
    while let Some(change) = stream.next().await {
        let value = change.value;
        if value == last_seen {
            continue;
        }
        last_seen = value.clone();

        // an accepted value supersedes every in-flight check
        if value.is_empty() {
            generation.fetch_add(1, Ordering::SeqCst);
            if active.load(Ordering::SeqCst) {
                field.set_error(config.error_kind(), None);
            }
            continue;
        }

        issue_check(&field, &snapshot, &check, &config, &active, &generation);
    }
}

fn issue_check<Snap, P, C>(
    field: &FieldHandle,
    snapshot: &P,
    check: &Arc<C>,
    config: &ValidatorConfig,
    active: &Arc<AtomicBool>,
    generation: &Arc<AtomicU64>,
) where
    Snap: Send + 'static,
    P: Fn() -> Snap + Send + Sync + 'static,
    C: Fn(Snap) -> CheckFuture + Send + Sync + 'static,
{
    let ticket = generation.fetch_add(1, Ordering::SeqCst) + 1;
    let fut = check(snapshot());

    let field = field.clone();
    let error_kind = config.error_kind().to_string();
    let active = Arc::clone(active);
    let generation = Arc::clone(generation);

    tokio::spawn(async move {
        let passed = fut.await;

        if !active.load(Ordering::SeqCst) || generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!(field = %field.name(), "discarding stale check result");
            return;
        }

        let payload = if passed { None } else { Some(json!(true)) };
        field.set_error(&error_kind, payload);
    });
}

/// Subscription handle for an attached validator
///
/// Dropping the guard (or calling [`detach`](Self::detach)) stops the
/// validator; no further error-state mutations occur.
#[derive(Debug)]
pub struct ValidatorGuard {
    handle: JoinHandle<()>,
    active: Arc<AtomicBool>,
}

impl ValidatorGuard {
    /// Detach the validator
    pub fn detach(self) {
        drop(self);
    }
}

impl Drop for ValidatorGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        self.handle.abort();
    }
}
