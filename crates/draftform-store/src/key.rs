//! Composite draft keys
//!
//! A draft slot is addressed by (root namespace, logical module, record
//! key). The canonical storage name joins the three with `-`; the record
//! key is `new` for an unsaved record or the decimal id for a persisted
//! one.

use crate::error::StoreError;
use std::fmt;

/// Identity of the record a draft belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    /// Record has not been persisted yet
    New,
    /// Persisted record id
    Id(u64),
}

impl RecordKey {
    /// Build a key from an optional persisted id
    #[inline]
    #[must_use]
    pub fn from_id(id: Option<u64>) -> Self {
        match id {
            Some(id) => Self::Id(id),
            None => Self::New,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => f.write_str("new"),
            Self::Id(id) => write!(f, "{id}"),
        }
    }
}

/// Composite key addressing one draft slot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DraftKey {
    root: String,
    module: String,
    record: RecordKey,
}

impl DraftKey {
    /// Create a key from its components
    ///
    /// # Errors
    /// - `StoreError::InvalidKey` if `root` or `module` is empty, or if
    ///   `module` contains the `-` separator. The record key renders as
    ///   `new` or digits, so keeping `-` out of the module name is what
    ///   makes [`storage_name`](Self::storage_name) injective across
    ///   distinct (module, record) pairs under one root.
    pub fn new(
        root: impl Into<String>,
        module: impl Into<String>,
        record: RecordKey,
    ) -> Result<Self, StoreError> {
        let root = root.into();
        let module = module.into();

        if root.is_empty() {
            return Err(StoreError::InvalidKey("root namespace is empty".into()));
        }
        if module.is_empty() {
            return Err(StoreError::InvalidKey("module name is empty".into()));
        }
        if module.contains('-') {
            return Err(StoreError::InvalidKey(format!(
                "module name `{module}` contains `-`"
            )));
        }

        Ok(Self {
            root,
            module,
            record,
        })
    }

    /// Root namespace
    #[inline]
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Logical module name
    #[inline]
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Record key component
    #[inline]
    #[must_use]
    pub fn record(&self) -> RecordKey {
        self.record
    }

    /// Same key, addressed to a different record
    #[inline]
    #[must_use]
    pub fn with_record(&self, record: RecordKey) -> Self {
        Self {
            root: self.root.clone(),
            module: self.module.clone(),
            record,
        }
    }

    /// Canonical storage name: `{root}-{module}-{record}`
    #[must_use]
    pub fn storage_name(&self) -> String {
        format!("{}-{}-{}", self.root, self.module, self.record)
    }
}

impl fmt::Display for DraftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn record_key_rendering() {
        assert_eq!(RecordKey::New.to_string(), "new");
        assert_eq!(RecordKey::Id(42).to_string(), "42");
        assert_eq!(RecordKey::from_id(None), RecordKey::New);
        assert_eq!(RecordKey::from_id(Some(7)), RecordKey::Id(7));
    }

    #[test]
    fn storage_name_joins_components() {
        let key = DraftKey::new("jps-async-val", "organization", RecordKey::Id(2)).unwrap();
        assert_eq!(key.storage_name(), "jps-async-val-organization-2");

        let key = key.with_record(RecordKey::New);
        assert_eq!(key.storage_name(), "jps-async-val-organization-new");
    }

    #[test]
    fn rejects_bad_components() {
        assert!(DraftKey::new("", "organization", RecordKey::New).is_err());
        assert!(DraftKey::new("app", "", RecordKey::New).is_err());
        assert!(DraftKey::new("app", "org-unit", RecordKey::New).is_err());
    }

    fn module_strategy() -> impl Strategy<Value = String> {
        "[a-z_]{1,12}"
    }

    fn record_strategy() -> impl Strategy<Value = RecordKey> {
        prop_oneof![
            Just(RecordKey::New),
            any::<u64>().prop_map(RecordKey::Id),
        ]
    }

    proptest! {
        #[test]
        fn storage_name_is_injective_under_one_root(
            m1 in module_strategy(),
            m2 in module_strategy(),
            r1 in record_strategy(),
            r2 in record_strategy(),
        ) {
            let k1 = DraftKey::new("app", m1, r1).unwrap();
            let k2 = DraftKey::new("app", m2, r2).unwrap();
            prop_assert_eq!(
                k1.storage_name() == k2.storage_name(),
                k1 == k2
            );
        }
    }
}
