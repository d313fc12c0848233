//! Flow chain: sessions endpoint → session in config → session id in
//! telemetry → any configuration at all ⇒ advanced → unknown.

use crate::known::ConfigField;
use crate::resolve::{AttributeSource, Flow, Resolved, ResolveInput};

pub fn resolve_flow(input: &ResolveInput<'_>) -> Resolved<Flow> {
    if input.network.saw_sessions_endpoint {
        return Resolved::new(Flow::Sessions, AttributeSource::SessionsEndpoint);
    }
    if input.snapshot.has(ConfigField::Session) {
        return Resolved::new(Flow::Sessions, AttributeSource::SessionConfig);
    }
    if input.network.telemetry_session_seen {
        return Resolved::new(Flow::Sessions, AttributeSource::TelemetrySession);
    }
    if !input.snapshot.is_empty() {
        return Resolved::new(Flow::Advanced, AttributeSource::ConfigPresence);
    }
    Resolved::new(Flow::Unknown, AttributeSource::Default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::NetworkFacts;
    use crate::snapshot::{CallbackOrigin, CapturedFragment, ConfigSnapshot, Provenance, SnapshotStore};
    use crate::trace::PageFacts;
    use serde_json::json;

    fn snapshot_with(entries: &[(ConfigField, serde_json::Value)]) -> ConfigSnapshot {
        let mut store = SnapshotStore::new();
        let mut fragment =
            CapturedFragment::new(Provenance::Primary, CallbackOrigin::TopLevel);
        for (field, value) in entries {
            fragment.insert(*field, value.clone());
        }
        store.merge(&fragment);
        store.publish()
    }

    #[test]
    fn sessions_endpoint_is_the_strongest_signal() {
        let snapshot = snapshot_with(&[(ConfigField::ClientKey, json!("test_X"))]);
        let network = NetworkFacts {
            saw_sessions_endpoint: true,
            ..Default::default()
        };
        let page = PageFacts::default();
        let input = ResolveInput {
            snapshot: &snapshot,
            network: &network,
            page: &page,
        };

        let resolved = resolve_flow(&input);
        assert_eq!(resolved.value, Flow::Sessions);
        assert_eq!(resolved.source, AttributeSource::SessionsEndpoint);
    }

    #[test]
    fn session_config_marker_resolves_sessions() {
        let snapshot = snapshot_with(&[(ConfigField::Session, json!({"id": "CS1"}))]);
        let network = NetworkFacts::default();
        let page = PageFacts::default();
        let input = ResolveInput {
            snapshot: &snapshot,
            network: &network,
            page: &page,
        };

        assert_eq!(resolve_flow(&input).value, Flow::Sessions);
        assert_eq!(resolve_flow(&input).source, AttributeSource::SessionConfig);
    }

    #[test]
    fn telemetry_session_id_resolves_sessions() {
        let snapshot = ConfigSnapshot::default();
        let network = NetworkFacts {
            telemetry_session_seen: true,
            ..Default::default()
        };
        let page = PageFacts::default();
        let input = ResolveInput {
            snapshot: &snapshot,
            network: &network,
            page: &page,
        };

        assert_eq!(resolve_flow(&input).source, AttributeSource::TelemetrySession);
    }

    #[test]
    fn plain_configuration_means_advanced() {
        let snapshot = snapshot_with(&[(ConfigField::ClientKey, json!("test_X"))]);
        let network = NetworkFacts::default();
        let page = PageFacts::default();
        let input = ResolveInput {
            snapshot: &snapshot,
            network: &network,
            page: &page,
        };

        let resolved = resolve_flow(&input);
        assert_eq!(resolved.value, Flow::Advanced);
        assert_eq!(resolved.source, AttributeSource::ConfigPresence);
    }

    #[test]
    fn nothing_at_all_is_unknown() {
        let snapshot = ConfigSnapshot::default();
        let network = NetworkFacts::default();
        let page = PageFacts::default();
        let input = ResolveInput {
            snapshot: &snapshot,
            network: &network,
            page: &page,
        };

        assert_eq!(resolve_flow(&input).value, Flow::Unknown);
    }
}
