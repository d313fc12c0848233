//! The canonical configuration accumulator.
//!
//! Capture hooks and the fallback walker produce [`CapturedFragment`]s;
//! [`SnapshotStore`] reconciles them under the precedence rules and
//! publishes plain, deeply-copied [`ConfigSnapshot`]s for downstream
//! consumers.

pub mod fragment;
pub mod merge;

pub use fragment::{CallbackOrigin, CapturedFragment, Provenance};
pub use merge::{ConfigSnapshot, FieldSlot, SnapshotStore};
