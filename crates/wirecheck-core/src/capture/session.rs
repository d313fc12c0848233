//! The injectable capture session.
//!
//! One session exists per page load. The host adapter (or the offline
//! trace replay) drives the `on_*` hooks; the session turns each
//! observation into fragments and merges them immediately. Hooks run
//! synchronously inside the host's own call stack, so they must return
//! promptly and may never surface an error; anything unexpected is
//! logged at debug level and dropped.

use serde_json::Value;
use tracing::debug;

use crate::capture::network::{self, NetworkFacts};
use crate::capture::shape;
use crate::snapshot::{CallbackOrigin, CapturedFragment, ConfigSnapshot, Provenance, SnapshotStore};
use crate::trace::RuntimeEvent;

#[derive(Debug, Default)]
pub struct CaptureSession {
    installed: bool,
    /// Set once a settled instance passed the structural predicate;
    /// gates sub-component capture, which only exists after the
    /// instance's `create` method has been wrapped.
    instance_captured: bool,
    store: SnapshotStore,
    network: NetworkFacts,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent installation. Returns `true` only for the call that
    /// actually installed; repeated injection is harmless.
    pub fn install(&mut self) -> bool {
        if self.installed {
            debug!("capture already installed, ignoring");
            return false;
        }
        self.installed = true;
        true
    }

    /// Page-load boundary: discard all capture state.
    pub fn reset(&mut self) {
        self.store.clear();
        self.network = NetworkFacts::default();
        self.instance_captured = false;
    }

    /// Replay one recorded event through the matching hook.
    pub fn observe(&mut self, event: &RuntimeEvent) {
        match event {
            RuntimeEvent::FactoryCall { config } => self.on_factory_call(config),
            RuntimeEvent::DeferredSettled { value } => self.on_deferred_settled(value),
            RuntimeEvent::ComponentConstructed { component, props } => {
                self.on_component_constructed(component, props);
            }
            RuntimeEvent::SubComponentCreated { component, props } => {
                self.on_sub_component_created(component, props);
            }
            RuntimeEvent::NetworkRequest { url, .. } => self.on_network_request(url),
            RuntimeEvent::Deserialized { value } => self.on_deserialized(value),
            RuntimeEvent::Unrecognized => debug!("skipping unrecognized event"),
        }
    }

    /// Factory call trapped: shallow shape match on the first argument.
    pub fn on_factory_call(&mut self, config: &Value) {
        if !self.installed {
            return;
        }
        let Some(object) = config.as_object() else {
            debug!("factory argument is not an object, dropped");
            return;
        };
        if let Some(fragment) =
            CapturedFragment::from_object(object, Provenance::Primary, CallbackOrigin::TopLevel)
        {
            self.store.merge(&fragment);
        }
    }

    /// Deferred factory result settled: test the structural predicate
    /// and, on a match, capture the instance's nested core options.
    pub fn on_deferred_settled(&mut self, value: &Value) {
        if !self.installed {
            return;
        }
        if !shape::looks_like_checkout_instance(value) {
            return;
        }
        let Some(options) = shape::instance_options(value) else {
            return;
        };
        if let Some(fragment) =
            CapturedFragment::from_object(options, Provenance::Primary, CallbackOrigin::TopLevel)
        {
            self.store.merge(&fragment);
        }
        // From here on the instance's `create` method is wrapped.
        self.instance_captured = true;
    }

    /// Component constructor trapped: second argument, secondary trust.
    pub fn on_component_constructed(&mut self, component: &str, props: &Value) {
        if !self.installed {
            return;
        }
        let Some(object) = props.as_object() else {
            debug!(component, "constructor props are not an object, dropped");
            return;
        };
        if let Some(fragment) = CapturedFragment::from_object(
            object,
            Provenance::Secondary,
            CallbackOrigin::SubComponent,
        ) {
            self.store.merge(&fragment);
        }
    }

    /// Sub-component produced by the wrapped instance `create` method.
    /// Only meaningful after an instance capture; stray events from a
    /// mismatched adapter are dropped.
    pub fn on_sub_component_created(&mut self, component: &str, props: &Value) {
        if !self.installed {
            return;
        }
        if !self.instance_captured {
            debug!(component, "sub-component event before instance capture, dropped");
            return;
        }
        let Some(object) = props.as_object() else {
            return;
        };
        if let Some(fragment) = CapturedFragment::from_object(
            object,
            Provenance::Secondary,
            CallbackOrigin::SubComponent,
        ) {
            self.store.merge(&fragment);
        }
    }

    /// Outgoing network call intercepted.
    pub fn on_network_request(&mut self, url: &str) {
        if !self.installed {
            return;
        }
        if let Some(fragment) = network::observe_url(&mut self.network, url) {
            self.store.merge(&fragment);
        }
    }

    /// Generic deserialization wrapped: shape-test every decoded object.
    pub fn on_deserialized(&mut self, value: &Value) {
        if !self.installed {
            return;
        }
        let Some(object) = value.as_object() else {
            return;
        };
        if !shape::looks_like_config(object) {
            return;
        }
        if let Some(fragment) =
            CapturedFragment::from_object(object, Provenance::Primary, CallbackOrigin::TopLevel)
        {
            self.store.merge(&fragment);
        }
    }

    /// Merge a fragment produced outside the hook paths (the fallback
    /// walker).
    pub fn absorb(&mut self, fragment: &CapturedFragment) {
        self.store.merge(fragment);
    }

    /// Whether any non-inferred capture fired. Drives the fallback
    /// walker decision.
    pub fn captured_anything(&self) -> bool {
        !self.store.primary_is_empty()
    }

    /// Publish a deep, plain copy of the merged snapshot.
    pub fn snapshot(&self) -> ConfigSnapshot {
        self.store.publish()
    }

    pub fn network(&self) -> &NetworkFacts {
        &self.network
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::known::ConfigField;
    use crate::resolve::Environment;
    use serde_json::json;

    fn installed() -> CaptureSession {
        let mut session = CaptureSession::new();
        session.install();
        session
    }

    #[test]
    fn install_is_idempotent() {
        let mut session = CaptureSession::new();
        assert!(session.install());
        assert!(!session.install());
        assert!(!session.install());
    }

    #[test]
    fn uninstalled_session_ignores_events() {
        let mut session = CaptureSession::new();
        session.on_factory_call(&json!({"clientKey": "test_X"}));
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn factory_call_produces_primary_top_level_fragment() {
        let mut session = installed();
        session.on_factory_call(&json!({
            "clientKey": "test_ABCDEF",
            "onSubmit": {"$fn": "() => {}"},
            "unrelated": 1
        }));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.get_str(ConfigField::ClientKey), Some("test_ABCDEF"));
        assert_eq!(
            snapshot.callback_origin(ConfigField::OnSubmit),
            Some(crate::snapshot::CallbackOrigin::TopLevel)
        );
    }

    #[test]
    fn non_object_payloads_are_contained() {
        let mut session = installed();
        session.on_factory_call(&json!("nope"));
        session.on_deferred_settled(&json!(42));
        session.on_deserialized(&json!([1, 2, 3]));
        session.on_component_constructed("card", &json!(null));
        assert!(session.snapshot().is_empty());
    }

    #[test]
    fn settled_instance_yields_richer_options() {
        let mut session = installed();
        session.on_factory_call(&json!({"clientKey": "test_ABCDEF"}));
        session.on_deferred_settled(&json!({
            "options": {
                "clientKey": "test_ABCDEF",
                "countryCode": "NL",
                "session": {"id": "CS42"}
            },
            "components": []
        }));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.get_str(ConfigField::CountryCode), Some("NL"));
        assert!(snapshot.has(ConfigField::Session));
    }

    #[test]
    fn sub_component_events_require_prior_instance_capture() {
        let mut session = installed();
        session.on_sub_component_created("card", &json!({"onSubmit": {"$fn": "early"}}));
        assert!(session.snapshot().is_empty());

        session.on_deferred_settled(&json!({
            "options": {"clientKey": "test_ABCDEF"},
            "mount": {}
        }));
        session.on_sub_component_created("card", &json!({"amount": {"value": 1000}}));

        assert!(session.snapshot().has(ConfigField::Amount));
    }

    #[test]
    fn sub_component_never_downgrades_top_level_callback() {
        let mut session = installed();
        session.on_factory_call(&json!({"onError": {"$fn": "top"}}));
        session.on_deferred_settled(&json!({
            "options": {"clientKey": "test_ABCDEF"},
            "update": {}
        }));
        session.on_sub_component_created("card", &json!({"onError": {"$fn": "sub"}}));

        let snapshot = session.snapshot();
        assert_eq!(snapshot.get(ConfigField::OnError), Some(&json!({"$fn": "top"})));
    }

    #[test]
    fn network_requests_feed_facts_and_inferred_bucket() {
        let mut session = installed();
        session.on_network_request(
            "https://checkout-live.paybright.com/v1/payments?clientKey=live_URLKEY99",
        );

        assert_eq!(session.network().api_environment, Some(Environment::Live));
        let snapshot = session.snapshot();
        assert!(snapshot.fields.is_empty());
        assert_eq!(snapshot.get_str(ConfigField::ClientKey), Some("live_URLKEY99"));
        assert!(!session.captured_anything());
    }

    #[test]
    fn deserialized_config_shapes_are_merged_as_primary() {
        let mut session = installed();
        session.on_deserialized(&json!({
            "paymentMethodsResponse": {"paymentMethods": []},
            "clientKey": "test_ABCDEF"
        }));

        assert!(session.captured_anything());
        assert!(session.snapshot().has(ConfigField::PaymentMethodsResponse));
    }

    #[test]
    fn replay_dispatches_all_event_kinds() {
        let mut session = installed();
        for event in [
            RuntimeEvent::FactoryCall {
                config: json!({"clientKey": "test_ABCDEF"}),
            },
            RuntimeEvent::NetworkRequest {
                url: "https://assets-test.paybright.com/sdk/1.2.3/checkout-web.js".into(),
                initiator: "script".into(),
            },
            RuntimeEvent::Unrecognized,
        ] {
            session.observe(&event);
        }

        assert!(session.captured_anything());
        assert_eq!(session.network().sdk_asset_version.as_deref(), Some("1.2.3"));
    }

    #[test]
    fn reset_discards_state_for_next_page_load() {
        let mut session = installed();
        session.on_factory_call(&json!({"clientKey": "test_ABCDEF"}));
        session.reset();

        assert!(session.snapshot().is_empty());
        assert_eq!(session.network(), &NetworkFacts::default());
    }
}
