//! Environment chain: explicit config token → client-key prefix →
//! observed hosts (API preferred over asset CDN) → unknown.

use crate::known::ConfigField;
use crate::resolve::{AttributeSource, Environment, Resolved, ResolveInput};

pub fn resolve_environment(input: &ResolveInput<'_>) -> Resolved<Environment> {
    if let Some(env) = config_token(input) {
        return Resolved::new(env, AttributeSource::ConfigToken);
    }
    if let Some(env) = client_key_prefix(input) {
        return Resolved::new(env, AttributeSource::ClientKeyPrefix);
    }
    if let Some(env) = input.network.api_environment {
        return Resolved::new(env, AttributeSource::ApiHost);
    }
    if let Some(env) = input.network.asset_environment {
        return Resolved::new(env, AttributeSource::AssetHost);
    }
    Resolved::new(Environment::Unknown, AttributeSource::Default)
}

/// Bare `test`/`live` or compound `live-<region>`. Anything else is no
/// signal, not an error.
fn config_token(input: &ResolveInput<'_>) -> Option<Environment> {
    match input.snapshot.get_str(ConfigField::Environment)? {
        "test" => Some(Environment::Test),
        token if token == "live" || token.starts_with("live-") => Some(Environment::Live),
        _ => None,
    }
}

fn client_key_prefix(input: &ResolveInput<'_>) -> Option<Environment> {
    let key = input.snapshot.get_str(ConfigField::ClientKey)?;
    if key.starts_with("test_") {
        Some(Environment::Test)
    } else if key.starts_with("live_") {
        Some(Environment::Live)
    } else {
        None
    }
}
