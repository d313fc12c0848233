use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::known::ConfigField;

/// Trust tier of a captured fragment.
///
/// `Primary` fragments come from the factory/deserialization paths where
/// the SDK itself handled the object; `Secondary` from component
/// constructor arguments; `Inferred` from passive network observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    Inferred,
    Secondary,
    Primary,
}

/// Where a callback-typed field was observed.
///
/// Top-level detection is trusted over sub-component detection and is
/// never downgraded once recorded (see `SnapshotStore::merge`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallbackOrigin {
    TopLevel,
    SubComponent,
}

/// A partial configuration map extracted from one capture event.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFragment {
    pub provenance: Provenance,
    /// Origin tag applied to any callback-typed fields in this fragment.
    pub callback_origin: CallbackOrigin,
    pub fields: BTreeMap<ConfigField, Value>,
}

impl CapturedFragment {
    pub fn new(provenance: Provenance, callback_origin: CallbackOrigin) -> Self {
        Self {
            provenance,
            callback_origin,
            fields: BTreeMap::new(),
        }
    }

    /// Shallow shape match: keep only recognized top-level keys.
    ///
    /// Returns `None` when the object carries no recognized field at
    /// all, which is how callers distinguish "configuration-shaped"
    /// objects from unrelated ones.
    pub fn from_object(
        object: &serde_json::Map<String, Value>,
        provenance: Provenance,
        callback_origin: CallbackOrigin,
    ) -> Option<Self> {
        let mut fragment = Self::new(provenance, callback_origin);
        for (key, value) in object {
            if let Some(field) = ConfigField::from_key(key) {
                fragment.fields.insert(field, value.clone());
            }
        }
        if fragment.fields.is_empty() {
            None
        } else {
            Some(fragment)
        }
    }

    pub fn insert(&mut self, field: ConfigField, value: Value) {
        self.fields.insert(field, value);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
