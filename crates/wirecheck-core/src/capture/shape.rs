//! Structural predicates over untyped runtime values.
//!
//! These are pure observations with no policy: each predicate documents
//! the exact keys it requires and tolerates everything else. The shapes
//! come from the SDK's public object model, not from any schema the
//! integrator controls.

use serde_json::{Map, Value};

use crate::known::{ConfigField, FUNCTION_KEY};

/// Marker properties only an *instantiated* checkout object carries.
/// A merely-configured options bag has none of these.
const INSTANCE_MARKERS: [&str; 4] = ["components", "modules", "mount", "update"];

/// Key under which an instance nests its resolved core options.
const OPTIONS_KEY: &str = "options";

/// Shallow configuration shape match: at least one recognized field.
pub fn looks_like_config(object: &Map<String, Value>) -> bool {
    object.keys().any(|key| ConfigField::from_key(key).is_some())
}

/// Structural predicate for a settled checkout *instance*.
///
/// Required: a nested `options` object whose `clientKey` is
/// identifier-shaped. Required: at least one of the instance markers
/// (`components`, `modules`, `mount`, `update`). Everything else is
/// optional and ignored.
pub fn looks_like_checkout_instance(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };

    let options_ok = object
        .get(OPTIONS_KEY)
        .and_then(Value::as_object)
        .and_then(|options| options.get(ConfigField::ClientKey.key()))
        .and_then(Value::as_str)
        .is_some_and(is_identifier_shaped);

    options_ok && INSTANCE_MARKERS.iter().any(|marker| object.contains_key(*marker))
}

/// Nested core options of an instance, when present.
pub fn instance_options(value: &Value) -> Option<&Map<String, Value>> {
    value.as_object()?.get(OPTIONS_KEY)?.as_object()
}

/// Identifier-shaped: a credential-looking token, not prose.
///
/// Accepts the vendor `test_`/`live_` prefix convention outright, or
/// any reasonably long run of identifier characters.
pub fn is_identifier_shaped(text: &str) -> bool {
    if text.starts_with("test_") || text.starts_with("live_") {
        return text.len() > 5;
    }
    text.len() >= 10 && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Handler source text when `value` is an adapter-serialized callable.
pub fn handler_source(value: &Value) -> Option<&str> {
    value.as_object()?.get(FUNCTION_KEY)?.as_str()
}
