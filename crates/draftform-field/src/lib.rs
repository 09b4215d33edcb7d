//! Field state and debounced async validation
//!
//! A [`FieldHandle`] holds one editable field's value and its error-kind
//! map, and publishes every value change on a broadcast stream. The
//! [`AsyncFieldValidator`] consumes that stream through a debounce window
//! and a distinct-until-changed filter, runs an asynchronous check against
//! the current form snapshot, and sets or clears a single named error kind
//! from the result without disturbing sibling kinds.
//!
//! # Example
//!
//! ```rust,ignore
//! use draftform_field::{AsyncFieldValidator, FieldHandle, ValidatorConfig};
//!
//! let field = FieldHandle::new("name", "Good Toys").with_required();
//! let guard = AsyncFieldValidator::attach(
//!     field.clone(),
//!     move || field.value(),
//!     move |candidate| Box::pin(async move { candidate != "taken" }),
//!     ValidatorConfig::default(),
//! );
//! // dropping `guard` detaches the validator
//! ```

#![warn(unreachable_pub)]

pub mod debounce;
pub mod errors;
pub mod field;
pub mod validator;

// Re-exports
pub use debounce::Debounced;
pub use errors::{ValidationState, ERROR_KIND_REQUIRED};
pub use field::{FieldChange, FieldHandle};
pub use validator::{AsyncFieldValidator, CheckFuture, ValidatorConfig, ValidatorGuard};
