//! The checks themselves: pure functions from the full signal snapshot
//! to exactly one finding each.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::capture::{NetworkFacts, network};
use crate::checks::catalog::{Category, CheckId, Impact, Severity, impact_of};
use crate::heuristics::Detection;
use crate::known::{ConfigField, Discriminator};
use crate::resolve::{AttributeSource, Environment, Flow, ImplementationAttributes, Region};
use crate::snapshot::ConfigSnapshot;
use crate::trace::PageFacts;

/// The full signal snapshot every check reads. All plain data.
#[derive(Debug, Clone, Copy)]
pub struct ScanSignals<'a> {
    pub snapshot: &'a ConfigSnapshot,
    pub attributes: &'a ImplementationAttributes,
    pub network: &'a NetworkFacts,
    pub page: &'a PageFacts,
    pub detections: &'a [Detection],
}

/// One evaluated check result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub category: Category,
    pub severity: Severity,
    pub impact: Impact,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Finding {
    fn new(id: CheckId, severity: Severity, title: impl Into<String>) -> Self {
        Self {
            id: id.as_str().to_string(),
            category: id.category(),
            severity,
            impact: impact_of(id, severity),
            title: title.into(),
            detail: None,
            remediation: None,
            reference: None,
        }
    }

    fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn remediation(mut self, remediation: impl Into<String>) -> Self {
        self.remediation = Some(remediation.into());
        self
    }
}

/// Evaluate the whole catalog. One finding per check, ids unique by
/// construction.
pub fn evaluate_all(signals: &ScanSignals<'_>) -> Vec<Finding> {
    CheckId::ALL
        .into_iter()
        .map(|id| evaluate(id, signals))
        .collect()
}

fn evaluate(id: CheckId, s: &ScanSignals<'_>) -> Finding {
    match id {
        CheckId::WKey01 => check_client_key(s),
        CheckId::WEnv01 => check_environment_resolved(s),
        CheckId::WEnv02 => check_key_environment_match(s),
        CheckId::WEnv03 => check_host_environment_cross(s),
        CheckId::WReg01 => check_explicit_region(s),
        CheckId::WFlow01 => check_sessions_flow(s),
        CheckId::WCb01 => check_error_handler(s),
        CheckId::WCb02 => check_completion_handler(s),
        CheckId::WHx01 => check_payment_method_filtering(s),
        CheckId::WHx02 => check_outcome_handling(s),
        CheckId::WVer01 => check_pinned_asset_version(s),
        CheckId::WMnt01 => check_something_mounted(s),
        CheckId::WAn01 => check_analytics(s),
    }
}

fn check_client_key(s: &ScanSignals<'_>) -> Finding {
    if s.snapshot.has(ConfigField::ClientKey) {
        Finding::new(CheckId::WKey01, Severity::Pass, "Client key detected")
    } else {
        Finding::new(CheckId::WKey01, Severity::Fail, "No client key detected")
            .remediation("Pass `clientKey` to the checkout factory configuration.")
    }
}

fn check_environment_resolved(s: &ScanSignals<'_>) -> Finding {
    let environment = &s.attributes.environment;
    if environment.value == Environment::Unknown {
        Finding::new(
            CheckId::WEnv01,
            Severity::Warn,
            "Environment could not be determined",
        )
        .detail("Neither configuration, client key, nor observed hosts identify the environment.")
    } else {
        Finding::new(CheckId::WEnv01, Severity::Pass, "Environment identified")
            .detail(format!("{:?} via {:?}", environment.value, environment.source))
    }
}

fn check_key_environment_match(s: &ScanSignals<'_>) -> Finding {
    let environment = s.attributes.environment.value;
    let Some(key) = s.snapshot.get_str(ConfigField::ClientKey) else {
        return Finding::new(CheckId::WEnv02, Severity::Skip, "No client key to cross-check");
    };
    let key_env = if key.starts_with("test_") {
        Environment::Test
    } else if key.starts_with("live_") {
        Environment::Live
    } else {
        return Finding::new(
            CheckId::WEnv02,
            Severity::Skip,
            "Client key has no environment prefix",
        );
    };
    if environment == Environment::Unknown {
        return Finding::new(CheckId::WEnv02, Severity::Skip, "Environment unknown");
    }
    if key_env == environment {
        Finding::new(CheckId::WEnv02, Severity::Pass, "Client key matches environment")
    } else {
        Finding::new(
            CheckId::WEnv02,
            Severity::Fail,
            "Client key prefix contradicts environment",
        )
        .detail(format!("key is {key_env:?}-prefixed, environment resolved {environment:?}"))
        .remediation("Use the credential issued for the configured environment.")
    }
}

fn check_host_environment_cross(s: &ScanSignals<'_>) -> Finding {
    match (s.network.asset_environment, s.network.api_environment) {
        (Some(asset), Some(api)) if asset == api => {
            Finding::new(CheckId::WEnv03, Severity::Pass, "Asset and API hosts agree")
        }
        (Some(asset), Some(api)) => Finding::new(
            CheckId::WEnv03,
            Severity::Fail,
            "Asset and API hosts disagree on environment",
        )
        .detail(format!("assets served from {asset:?}, API calls hit {api:?}")),
        _ => Finding::new(
            CheckId::WEnv03,
            Severity::Skip,
            "Not enough host traffic to cross-check",
        ),
    }
}

fn check_explicit_region(s: &ScanSignals<'_>) -> Finding {
    match s.attributes.environment.value {
        Environment::Live => {}
        // Region is meaningless on test and undecidable otherwise.
        _ => return Finding::new(CheckId::WReg01, Severity::Skip, "Region not applicable"),
    }
    if s.attributes.region.value == Region::Unknown {
        Finding::new(CheckId::WReg01, Severity::Warn, "Live region not pinned")
            .remediation("Configure the regional environment token (e.g. `live-us`).")
    } else {
        Finding::new(CheckId::WReg01, Severity::Pass, "Live region identified")
            .detail(format!("{:?}", s.attributes.region.value))
    }
}

fn check_sessions_flow(s: &ScanSignals<'_>) -> Finding {
    match s.attributes.flow.value {
        Flow::Sessions => Finding::new(CheckId::WFlow01, Severity::Pass, "Sessions flow in use"),
        Flow::Advanced => Finding::new(
            CheckId::WFlow01,
            Severity::Notice,
            "Advanced flow in use",
        )
        .detail("Verify the integration genuinely needs the advanced flow."),
        Flow::Unknown => {
            Finding::new(CheckId::WFlow01, Severity::Skip, "Flow could not be determined")
        }
    }
}

fn check_error_handler(s: &ScanSignals<'_>) -> Finding {
    if s.snapshot.has(ConfigField::OnError) {
        Finding::new(CheckId::WCb01, Severity::Pass, "Error handler wired")
    } else {
        Finding::new(CheckId::WCb01, Severity::Warn, "No error handler detected")
            .remediation("Wire `onError` so failed payments surface to the shopper.")
    }
}

fn check_completion_handler(s: &ScanSignals<'_>) -> Finding {
    if s.snapshot.has(ConfigField::OnPaymentCompleted) {
        Finding::new(CheckId::WCb02, Severity::Pass, "Completion handler wired")
    } else {
        Finding::new(CheckId::WCb02, Severity::Warn, "No completion handler detected")
    }
}

fn heuristic_finding(
    id: CheckId,
    s: &ScanSignals<'_>,
    discriminator: Discriminator,
    flagged_title: &str,
    clean_title: &str,
) -> Finding {
    let hits: Vec<&Detection> = s
        .detections
        .iter()
        .filter(|d| d.discriminator == discriminator)
        .collect();
    match hits.first() {
        None => Finding::new(id, Severity::Pass, clean_title),
        Some(first) => Finding::new(id, Severity::Warn, flagged_title).detail(format!(
            "{} occurrence(s); first in `{}`: {}",
            hits.len(),
            first.handler,
            first.excerpt
        )),
    }
}

fn check_payment_method_filtering(s: &ScanSignals<'_>) -> Finding {
    heuristic_finding(
        CheckId::WHx01,
        s,
        Discriminator::PaymentMethod,
        "Handler filters on hardcoded payment method",
        "No hardcoded payment-method filtering detected",
    )
}

fn check_outcome_handling(s: &ScanSignals<'_>) -> Finding {
    heuristic_finding(
        CheckId::WHx02,
        s,
        Discriminator::Outcome,
        "Outcome handling misses a catch-all branch",
        "Outcome handling looks exhaustive",
    )
}

fn check_pinned_asset_version(s: &ScanSignals<'_>) -> Finding {
    let any_asset = !s.network.sdk_asset_urls.is_empty() || s.page.sdk_script_url.is_some();
    if !any_asset {
        return Finding::new(CheckId::WVer01, Severity::Skip, "No SDK asset URL observed");
    }
    let version = s.network.sdk_asset_version.clone().or_else(|| {
        s.page
            .sdk_script_url
            .as_deref()
            .and_then(network::asset_version_of)
    });
    match version {
        Some(version) => {
            Finding::new(CheckId::WVer01, Severity::Pass, "SDK version pinned")
                .detail(version)
        }
        None => Finding::new(CheckId::WVer01, Severity::Warn, "SDK version not pinned")
            .detail("Asset URL carries no version segment; the page tracks whatever ships next."),
    }
}

fn check_something_mounted(s: &ScanSignals<'_>) -> Finding {
    if s.attributes.flavor.source == AttributeSource::SdkLoadedNotMounted {
        return Finding::new(CheckId::WMnt01, Severity::Fail, "SDK loaded but nothing mounted")
            .remediation("Call `mount` on a container element after creating the checkout.");
    }
    let sdk_seen = s.page.sdk_script_url.is_some()
        || !s.network.sdk_asset_urls.is_empty()
        || !s.snapshot.is_empty();
    if sdk_seen {
        Finding::new(CheckId::WMnt01, Severity::Pass, "Checkout UI mounted")
    } else {
        Finding::new(CheckId::WMnt01, Severity::Skip, "No SDK activity observed")
    }
}

fn check_analytics(s: &ScanSignals<'_>) -> Finding {
    let disabled = match s.snapshot.get(ConfigField::Analytics) {
        Some(Value::Bool(enabled)) => !enabled,
        Some(Value::Object(object)) => {
            object.get("enabled").and_then(Value::as_bool) == Some(false)
        }
        _ => false,
    };
    if disabled {
        Finding::new(CheckId::WAn01, Severity::Info, "SDK analytics disabled")
            .detail("Vendor-side diagnostics will have no data for this integration.")
    } else {
        Finding::new(CheckId::WAn01, Severity::Pass, "SDK analytics enabled")
    }
}
