//! Editing session state machine
//!
//! `Uninitialized -> Loaded -> {Editing <-> Dirty} -> Saved | Discarded`.
//! A change moves the session through Editing into Dirty once the draft
//! write lands; discard returns to Loaded; a validated save reaches Saved.

use crate::error::EditorError;

/// State of one editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Session exists but no record has been loaded
    Uninitialized,
    /// Form populated from the record or a restored draft
    Loaded,
    /// A change is being processed
    Editing,
    /// Unsaved changes are mirrored into the draft store
    Dirty,
    /// Record committed to the collection, draft cleared
    Saved,
    /// Session closed without saving
    Discarded,
}

/// Validates a state transition.
pub fn validate_transition(from: SessionState, to: SessionState) -> Result<(), EditorError> {
    if allowed(from, to) {
        Ok(())
    } else {
        Err(EditorError::IllegalTransition { from, to })
    }
}

/// States reachable from `from` in one step
pub fn allowed_transitions(from: SessionState) -> Vec<SessionState> {
    use SessionState::*;
    match from {
        Uninitialized => vec![Loaded],
        Loaded => vec![Editing, Saved, Discarded],
        Editing => vec![Dirty, Loaded, Saved, Discarded],
        Dirty => vec![Editing, Loaded, Saved, Discarded],
        Saved => vec![Editing, Loaded, Saved, Discarded],
        Discarded => vec![],
    }
}

fn allowed(from: SessionState, to: SessionState) -> bool {
    allowed_transitions(from).into_iter().any(|s| s == to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionState::*;

    #[test]
    fn edit_save_path_is_legal() {
        for (from, to) in [
            (Uninitialized, Loaded),
            (Loaded, Editing),
            (Editing, Dirty),
            (Dirty, Editing),
            (Dirty, Saved),
        ] {
            validate_transition(from, to).unwrap();
        }
    }

    #[test]
    fn discard_returns_to_loaded() {
        validate_transition(Dirty, Loaded).unwrap();
        validate_transition(Editing, Loaded).unwrap();
    }

    #[test]
    fn terminal_states() {
        assert!(allowed_transitions(Discarded).is_empty());
        // a saved session may be edited further or reloaded
        validate_transition(Saved, Editing).unwrap();
        validate_transition(Saved, Loaded).unwrap();
    }

    #[test]
    fn illegal_transitions_are_reported() {
        let err = validate_transition(Uninitialized, Saved).unwrap_err();
        assert!(matches!(
            err,
            EditorError::IllegalTransition {
                from: Uninitialized,
                to: Saved
            }
        ));
        assert!(validate_transition(Discarded, Loaded).is_err());
    }
}
