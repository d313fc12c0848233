//! Passive network observation.
//!
//! Outgoing request URLs are the one channel the integrator cannot
//! reshape: host names follow the vendor naming convention and query
//! strings leak identifying configuration. Everything extracted here is
//! `Inferred` provenance: useful context, never trusted over a real
//! capture.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::known::{self, ConfigField, HostKind};
use crate::resolve::{Environment, Region};
use crate::snapshot::{CallbackOrigin, CapturedFragment, Provenance};

/// Which kind of host served the SDK bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdkAssetOrigin {
    VendorCdn,
    Other,
}

/// Accumulated facts from passively observed network traffic.
///
/// Asset-host and API-host classifications are kept separate so the two
/// can be cross-checked against each other for mismatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkFacts {
    pub api_environment: Option<Environment>,
    pub api_region: Option<Region>,
    pub asset_environment: Option<Environment>,
    pub asset_region: Option<Region>,
    /// An API call hit the session-initiation endpoint.
    pub saw_sessions_endpoint: bool,
    /// `flavor` value reported in analytics telemetry, verbatim.
    pub telemetry_flavor: Option<String>,
    /// Telemetry carried a checkout session identifier.
    pub telemetry_session_seen: bool,
    /// URLs that plausibly served the SDK bundle.
    pub sdk_asset_urls: Vec<String>,
    pub sdk_asset_origin: Option<SdkAssetOrigin>,
    /// Pinned SDK version parsed from an asset URL path.
    pub sdk_asset_version: Option<String>,
}

static ASSET_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/v?(\d+\.\d+\.\d+)/").expect("fixed pattern"));

/// Pinned SDK version embedded in an asset URL path, if any.
pub fn asset_version_of(url: &str) -> Option<String> {
    ASSET_VERSION.captures(url).map(|c| c[1].to_string())
}

/// Record one outgoing request.
///
/// Updates `facts` in place and returns an inferred fragment when the
/// URL carried identifying configuration. First classification wins for
/// each host role; later traffic never flips an already-observed
/// environment (the cross-check finding reports disagreement instead).
pub fn observe_url(facts: &mut NetworkFacts, url: &str) -> Option<CapturedFragment> {
    let host = host_of(url)?;
    let path = path_of(url);

    if let Some(host_facts) = known::classify_host(host) {
        match host_facts.kind {
            HostKind::Api => {
                if facts.api_environment.is_none() {
                    facts.api_environment = Some(host_facts.environment);
                    facts.api_region = host_facts.region;
                }
                if path.contains("/sessions") {
                    facts.saw_sessions_endpoint = true;
                }
            }
            HostKind::AssetCdn => {
                if facts.asset_environment.is_none() {
                    facts.asset_environment = Some(host_facts.environment);
                    facts.asset_region = host_facts.region;
                }
            }
            HostKind::Analytics => {
                if let Some(flavor) = query_param(url, "flavor") {
                    facts.telemetry_flavor.get_or_insert(flavor);
                }
                if query_param(url, "checkoutSessionId").is_some() {
                    facts.telemetry_session_seen = true;
                }
            }
        }
    }

    if known::looks_like_sdk_asset(url) {
        let origin = match known::classify_host(host).map(|f| f.kind) {
            Some(HostKind::AssetCdn) => SdkAssetOrigin::VendorCdn,
            _ => SdkAssetOrigin::Other,
        };
        // A vendor-CDN sighting outranks a self-hosted one.
        if facts.sdk_asset_origin != Some(SdkAssetOrigin::VendorCdn) {
            facts.sdk_asset_origin = Some(origin);
        }
        if facts.sdk_asset_version.is_none() {
            facts.sdk_asset_version = asset_version_of(path);
        }
        facts.sdk_asset_urls.push(url.to_string());
    }

    let mut fragment =
        CapturedFragment::new(Provenance::Inferred, CallbackOrigin::SubComponent);
    if let Some(client_key) = query_param(url, ConfigField::ClientKey.key()) {
        fragment.insert(ConfigField::ClientKey, client_key.into());
    }
    if fragment.is_empty() { None } else { Some(fragment) }
}

/// Host portion of a URL, without scheme, port, or userinfo.
fn host_of(url: &str) -> Option<&str> {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host);
    let host = host.split(':').next()?;
    if host.is_empty() { None } else { Some(host) }
}

fn path_of(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    match rest.find('/') {
        Some(idx) => rest[idx..].split(['?', '#']).next().unwrap_or(""),
        None => "",
    }
}

/// Best-effort query lookup; no percent-decoding.
fn query_param(url: &str, name: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}
