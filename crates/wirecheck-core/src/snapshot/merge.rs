//! Signal merge and precedence resolution.
//!
//! One [`SnapshotStore`] exists per capture session. Merging is
//! synchronous and idempotent; the execution model (hooks run to
//! completion, single-threaded) means no locking is needed, so the
//! precedence rules below are the whole concurrency story:
//!
//! - callback fields recorded at `TopLevel` origin are immune to
//!   overwrite by a `SubComponent`-tagged value (never downgraded);
//! - `Inferred` fragments land in a separate bucket consulted only when
//!   the primary map lacks the field;
//! - everything else is last-fragment-wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::known::ConfigField;
use crate::snapshot::fragment::{CallbackOrigin, CapturedFragment, Provenance};

/// One resolved field in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSlot {
    pub value: Value,
    pub provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_origin: Option<CallbackOrigin>,
}

/// The canonical append-only accumulator.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    fields: BTreeMap<ConfigField, FieldSlot>,
    inferred: BTreeMap<ConfigField, FieldSlot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one fragment under the precedence rules.
    pub fn merge(&mut self, fragment: &CapturedFragment) {
        for (field, value) in &fragment.fields {
            if fragment.provenance == Provenance::Inferred {
                self.inferred.insert(
                    *field,
                    FieldSlot {
                        value: value.clone(),
                        provenance: Provenance::Inferred,
                        callback_origin: None,
                    },
                );
                continue;
            }

            let callback_origin = if field.is_callback() {
                if self.top_level_locked(*field)
                    && fragment.callback_origin == CallbackOrigin::SubComponent
                {
                    // Never downgrade a top-level callback detection.
                    continue;
                }
                Some(fragment.callback_origin)
            } else {
                None
            };

            self.fields.insert(
                *field,
                FieldSlot {
                    value: value.clone(),
                    provenance: fragment.provenance,
                    callback_origin,
                },
            );
        }
    }

    fn top_level_locked(&self, field: ConfigField) -> bool {
        self.fields
            .get(&field)
            .is_some_and(|slot| slot.callback_origin == Some(CallbackOrigin::TopLevel))
    }

    /// Whether any non-inferred capture has landed yet.
    ///
    /// The fallback walker keys off this: network-inferred values alone
    /// do not count as recovered configuration.
    pub fn primary_is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Publish a deep, plain copy safe to hand across the boundary.
    pub fn publish(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            fields: self.fields.clone(),
            inferred: self.inferred.clone(),
        }
    }

    /// Page-load boundary: discard all accumulated state.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.inferred.clear();
    }
}

/// Published snapshot: plain data, no live references or callables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    #[serde(default)]
    pub fields: BTreeMap<ConfigField, FieldSlot>,
    #[serde(default)]
    pub inferred: BTreeMap<ConfigField, FieldSlot>,
}

impl ConfigSnapshot {
    /// Field lookup; the inferred bucket is consulted only on a
    /// primary miss.
    pub fn get(&self, field: ConfigField) -> Option<&Value> {
        self.fields
            .get(&field)
            .or_else(|| self.inferred.get(&field))
            .map(|slot| &slot.value)
    }

    pub fn get_str(&self, field: ConfigField) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn has(&self, field: ConfigField) -> bool {
        self.get(field).is_some()
    }

    pub fn callback_origin(&self, field: ConfigField) -> Option<CallbackOrigin> {
        self.fields.get(&field).and_then(|slot| slot.callback_origin)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.inferred.is_empty()
    }
}
