//! Fixed collaborator tables consumed by the engine.
//!
//! Everything here is data, not behavior: the recognized configuration
//! field names, the vendor host-naming table, the selector-discriminator
//! patterns for the heuristic detector, and a handful of marker strings.
//! Keeping these in one module means the capture, resolve, and heuristic
//! layers never hard-code vendor conventions themselves.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::resolve::{Environment, Region};

/// Key under which the host adapter serializes a captured callable.
/// The value is the handler's source text, bounded by the adapter.
pub const FUNCTION_KEY: &str = "$fn";

/// Class-attribute substring marking SDK-rendered mount elements.
pub const MOUNT_MARKER_CLASS: &str = "pb-checkout";

/// Class-attribute substring specific to the styled drop-in widget.
pub const DROPIN_MARKER_CLASS: &str = "pb-dropin";

/// Configuration fields the capture layer recognizes by name.
///
/// Shallow shape matching is done against exactly this set; anything
/// else in an observed object is ignored. Serialized as the camelCase
/// key the SDK itself uses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ConfigField {
    ClientKey,
    Environment,
    Session,
    Amount,
    CountryCode,
    Locale,
    Analytics,
    PaymentMethodsResponse,
    OnSubmit,
    OnPaymentCompleted,
    OnPaymentFailed,
    OnError,
    OnAdditionalDetails,
}

impl ConfigField {
    pub const ALL: [ConfigField; 13] = [
        ConfigField::ClientKey,
        ConfigField::Environment,
        ConfigField::Session,
        ConfigField::Amount,
        ConfigField::CountryCode,
        ConfigField::Locale,
        ConfigField::Analytics,
        ConfigField::PaymentMethodsResponse,
        ConfigField::OnSubmit,
        ConfigField::OnPaymentCompleted,
        ConfigField::OnPaymentFailed,
        ConfigField::OnError,
        ConfigField::OnAdditionalDetails,
    ];

    /// The camelCase key this field appears under in integrator code.
    pub fn key(self) -> &'static str {
        match self {
            ConfigField::ClientKey => "clientKey",
            ConfigField::Environment => "environment",
            ConfigField::Session => "session",
            ConfigField::Amount => "amount",
            ConfigField::CountryCode => "countryCode",
            ConfigField::Locale => "locale",
            ConfigField::Analytics => "analytics",
            ConfigField::PaymentMethodsResponse => "paymentMethodsResponse",
            ConfigField::OnSubmit => "onSubmit",
            ConfigField::OnPaymentCompleted => "onPaymentCompleted",
            ConfigField::OnPaymentFailed => "onPaymentFailed",
            ConfigField::OnError => "onError",
            ConfigField::OnAdditionalDetails => "onAdditionalDetails",
        }
    }

    pub fn from_key(key: &str) -> Option<ConfigField> {
        ConfigField::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Callback-typed fields carry a top-level/sub-component origin tag
    /// in addition to provenance.
    pub fn is_callback(self) -> bool {
        matches!(
            self,
            ConfigField::OnSubmit
                | ConfigField::OnPaymentCompleted
                | ConfigField::OnPaymentFailed
                | ConfigField::OnError
                | ConfigField::OnAdditionalDetails
        )
    }
}

/// What role a classified vendor host plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKind {
    AssetCdn,
    Api,
    Analytics,
}

/// Environment/region facts encoded in a vendor host name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostFacts {
    pub kind: HostKind,
    pub environment: Environment,
    pub region: Option<Region>,
}

const VENDOR_DOMAIN: &str = ".paybright.com";

/// Classify a host name against the vendor naming convention.
///
/// Vendor hosts follow `<role>-<env>[-<region>]{VENDOR_DOMAIN}` where
/// role is `checkout` (API), `assets` (SDK asset CDN) or `telemetry`
/// (analytics collector). Anything that does not match returns `None`;
/// callers treat unrecognized hosts as integrator-owned.
pub fn classify_host(host: &str) -> Option<HostFacts> {
    let label = host.strip_suffix(VENDOR_DOMAIN)?;
    let mut parts = label.split('-');

    let kind = match parts.next()? {
        "checkout" => HostKind::Api,
        "assets" => HostKind::AssetCdn,
        "telemetry" => HostKind::Analytics,
        _ => return None,
    };

    let environment = match parts.next()? {
        "test" => Environment::Test,
        "live" => Environment::Live,
        _ => return None,
    };

    let region = match parts.next() {
        Some(token) => Some(region_from_token(token)?),
        None => None,
    };

    Some(HostFacts {
        kind,
        environment,
        region,
    })
}

/// Region lookup for host-name and config-token suffixes.
pub fn region_from_token(token: &str) -> Option<Region> {
    match token {
        "eu" => Some(Region::Eu),
        "us" => Some(Region::Us),
        "au" => Some(Region::Au),
        "apse" => Some(Region::ApSoutheast),
        "in" => Some(Region::In),
        _ => None,
    }
}

/// Whether a URL plausibly served the SDK bundle itself.
///
/// Purely name-based: the vendor ships `checkout-web*.js`, and
/// self-hosting integrators usually keep the file name.
pub fn looks_like_sdk_asset(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.ends_with(".js") && (path.contains("checkout-web") || path.contains("pb-checkout"))
}

/// Semantic category of a selector field the heuristic detector targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Discriminator {
    PaymentMethod,
    Outcome,
}

/// Payment-method discriminator: `paymentMethod.type` in either member
/// access spelling.
pub static PAYMENT_METHOD_SELECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"paymentMethod\s*(?:\.\s*type\b|\[\s*["']type["']\s*\])"#).expect("fixed pattern")
});

/// Outcome discriminator: the `resultCode` field of a payment result.
pub static OUTCOME_SELECTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bresultCode\b|\bresult\s*\.\s*code\b"#).expect("fixed pattern")
});

/// Single-line string literal, either quote style.
pub static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"\n]*"|'[^'\n]*'"#).expect("fixed pattern"));

/// `case` label with a string-literal value.
pub static CASE_LITERAL_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bcase\s*["']"#).expect("fixed pattern"));

/// `default:` label, with optional interior whitespace.
pub static DEFAULT_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bdefault\s*:"#).expect("fixed pattern"));

/// First discriminator category matching `text`, if any.
pub fn discriminator_in(text: &str) -> Option<Discriminator> {
    if PAYMENT_METHOD_SELECTOR.is_match(text) {
        Some(Discriminator::PaymentMethod)
    } else if OUTCOME_SELECTOR.is_match(text) {
        Some(Discriminator::Outcome)
    } else {
        None
    }
}
