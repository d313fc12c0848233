use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::trace::TraceError;

/// One observation recorded by the host adapter.
///
/// The adapter evolves independently of this crate, so deserialization
/// is lenient: unknown event types and malformed payloads collapse into
/// `Unrecognized` and are skipped during replay instead of failing the
/// whole trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    /// The page called the trapped SDK factory; first argument captured.
    FactoryCall {
        #[serde(default)]
        config: Value,
    },
    /// A deferred factory result settled successfully.
    DeferredSettled {
        #[serde(default)]
        value: Value,
    },
    /// The trapped component constructor ran; second argument captured.
    ComponentConstructed {
        component: String,
        #[serde(default)]
        props: Value,
    },
    /// The wrapped instance `create` method produced a sub-component.
    SubComponentCreated {
        component: String,
        #[serde(default)]
        props: Value,
    },
    /// An outgoing network call left the page.
    NetworkRequest {
        url: String,
        #[serde(default)]
        initiator: String,
    },
    /// The runtime's generic deserialization entry point decoded this.
    Deserialized {
        #[serde(default)]
        value: Value,
    },
    #[serde(other)]
    Unrecognized,
}

/// Serialized retained UI-component node, including isolated sub-trees.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiNode {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub class: String,
    /// Whether the adapter found retained-component metadata here.
    #[serde(default)]
    pub component_meta: bool,
    /// Nested "core options" object, when this node exposes one.
    #[serde(default)]
    pub core_options: Option<Value>,
    #[serde(default)]
    pub children: Vec<UiNode>,
    /// Children inside an isolated (shadow) sub-tree.
    #[serde(default)]
    pub shadow_children: Vec<UiNode>,
}

/// Passive page-level facts the adapter collects outside the hook paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageFacts {
    /// `src` of the script tag that loaded the SDK, when one was found.
    #[serde(default)]
    pub sdk_script_url: Option<String>,
    /// A drop-in marker class was present in the DOM.
    #[serde(default)]
    pub dropin_marker: bool,
    /// A component marker class was present in the DOM.
    #[serde(default)]
    pub components_marker: bool,
    /// Count of SDK-rendered mount containers in the DOM.
    #[serde(default)]
    pub mounted_containers: u32,
}

/// One page load's worth of recorded observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureTrace {
    #[serde(default, deserialize_with = "lenient_events")]
    pub events: Vec<RuntimeEvent>,
    /// Handler source snippets keyed by handler name, length-bounded by
    /// the adapter.
    #[serde(default)]
    pub handlers: BTreeMap<String, String>,
    #[serde(default)]
    pub ui_tree: Option<UiNode>,
    #[serde(default)]
    pub page: PageFacts,
}

/// Deserializes each event independently, so one malformed entry (an
/// unknown `type`, or a known `type` missing a required field) collapses
/// into `Unrecognized` instead of invalidating every other event.
fn lenient_events<'de, D>(deserializer: D) -> Result<Vec<RuntimeEvent>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|event| serde_json::from_value(event).unwrap_or(RuntimeEvent::Unrecognized))
        .collect())
}

pub fn parse_trace(bytes: &[u8]) -> Result<CaptureTrace, TraceError> {
    Ok(serde_json::from_slice(bytes)?)
}
