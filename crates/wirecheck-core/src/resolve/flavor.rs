//! Flavor chain: telemetry-reported value → asset-URL naming → DOM
//! marker → configuration presence ⇒ custom → "loaded but nothing
//! mounted" → unknown.
//!
//! The not-mounted case deliberately keeps the value `Unknown` and
//! records the distinct source instead of widening the enum.

use crate::resolve::{AttributeSource, Flavor, Resolved, ResolveInput};

pub fn resolve_flavor(input: &ResolveInput<'_>) -> Resolved<Flavor> {
    if let Some(flavor) = telemetry_value(input) {
        return Resolved::new(flavor, AttributeSource::TelemetryFlavor);
    }
    if let Some(flavor) = asset_url_pattern(input) {
        return Resolved::new(flavor, AttributeSource::AssetUrlPattern);
    }
    if input.page.dropin_marker {
        return Resolved::new(Flavor::DropIn, AttributeSource::DomMarker);
    }
    if input.page.components_marker {
        return Resolved::new(Flavor::Components, AttributeSource::DomMarker);
    }
    if !input.snapshot.is_empty() {
        return Resolved::new(Flavor::Custom, AttributeSource::ConfigPresence);
    }
    if sdk_loaded(input) && input.page.mounted_containers == 0 {
        return Resolved::new(Flavor::Unknown, AttributeSource::SdkLoadedNotMounted);
    }
    Resolved::new(Flavor::Unknown, AttributeSource::Default)
}

fn telemetry_value(input: &ResolveInput<'_>) -> Option<Flavor> {
    match input.network.telemetry_flavor.as_deref()? {
        "dropin" => Some(Flavor::DropIn),
        "components" => Some(Flavor::Components),
        "custom" => Some(Flavor::Custom),
        _ => None,
    }
}

fn asset_url_pattern(input: &ResolveInput<'_>) -> Option<Flavor> {
    for url in &input.network.sdk_asset_urls {
        if url.contains("/dropin") {
            return Some(Flavor::DropIn);
        }
        if url.contains("/components") {
            return Some(Flavor::Components);
        }
    }
    None
}

fn sdk_loaded(input: &ResolveInput<'_>) -> bool {
    input.page.sdk_script_url.is_some() || !input.network.sdk_asset_urls.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::NetworkFacts;
    use crate::known::ConfigField;
    use crate::snapshot::{CallbackOrigin, CapturedFragment, ConfigSnapshot, Provenance, SnapshotStore};
    use crate::trace::PageFacts;
    use serde_json::json;

    fn configured_snapshot() -> ConfigSnapshot {
        let mut store = SnapshotStore::new();
        let mut fragment =
            CapturedFragment::new(Provenance::Primary, CallbackOrigin::TopLevel);
        fragment.insert(ConfigField::ClientKey, json!("test_X"));
        store.merge(&fragment);
        store.publish()
    }

    #[test]
    fn telemetry_value_outranks_everything() {
        let snapshot = configured_snapshot();
        let network = NetworkFacts {
            telemetry_flavor: Some("components".into()),
            sdk_asset_urls: vec!["https://x.example/dropin/checkout-web.js".into()],
            ..Default::default()
        };
        let page = PageFacts {
            dropin_marker: true,
            ..Default::default()
        };
        let input = ResolveInput {
            snapshot: &snapshot,
            network: &network,
            page: &page,
        };

        let resolved = resolve_flavor(&input);
        assert_eq!(resolved.value, Flavor::Components);
        assert_eq!(resolved.source, AttributeSource::TelemetryFlavor);
    }

    #[test]
    fn unrecognized_telemetry_value_falls_through() {
        let snapshot = ConfigSnapshot::default();
        let network = NetworkFacts {
            telemetry_flavor: Some("embedded".into()),
            sdk_asset_urls: vec!["https://a.example/components/checkout-web.js".into()],
            ..Default::default()
        };
        let page = PageFacts::default();
        let input = ResolveInput {
            snapshot: &snapshot,
            network: &network,
            page: &page,
        };

        let resolved = resolve_flavor(&input);
        assert_eq!(resolved.value, Flavor::Components);
        assert_eq!(resolved.source, AttributeSource::AssetUrlPattern);
    }

    #[test]
    fn dom_markers_rank_above_config_presence() {
        let snapshot = configured_snapshot();
        let network = NetworkFacts::default();
        let page = PageFacts {
            components_marker: true,
            ..Default::default()
        };
        let input = ResolveInput {
            snapshot: &snapshot,
            network: &network,
            page: &page,
        };

        let resolved = resolve_flavor(&input);
        assert_eq!(resolved.value, Flavor::Components);
        assert_eq!(resolved.source, AttributeSource::DomMarker);
    }

    #[test]
    fn config_without_markers_is_custom() {
        let snapshot = configured_snapshot();
        let network = NetworkFacts::default();
        let page = PageFacts::default();
        let input = ResolveInput {
            snapshot: &snapshot,
            network: &network,
            page: &page,
        };

        assert_eq!(resolve_flavor(&input).value, Flavor::Custom);
    }

    #[test]
    fn loaded_but_not_mounted_keeps_value_unknown_with_distinct_source() {
        let snapshot = ConfigSnapshot::default();
        let network = NetworkFacts::default();
        let page = PageFacts {
            sdk_script_url: Some("https://assets-test.paybright.com/checkout-web.js".into()),
            mounted_containers: 0,
            ..Default::default()
        };
        let input = ResolveInput {
            snapshot: &snapshot,
            network: &network,
            page: &page,
        };

        let resolved = resolve_flavor(&input);
        assert_eq!(resolved.value, Flavor::Unknown);
        assert_eq!(resolved.source, AttributeSource::SdkLoadedNotMounted);
    }

    #[test]
    fn nothing_observed_is_plain_unknown() {
        let snapshot = ConfigSnapshot::default();
        let network = NetworkFacts::default();
        let page = PageFacts::default();
        let input = ResolveInput {
            snapshot: &snapshot,
            network: &network,
            page: &page,
        };

        let resolved = resolve_flavor(&input);
        assert_eq!(resolved.value, Flavor::Unknown);
        assert_eq!(resolved.source, AttributeSource::Default);
    }
}
