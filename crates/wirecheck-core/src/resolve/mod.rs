//! Implementation attribute resolution.
//!
//! Each derived attribute has an explicit, ordered signal-priority
//! chain; the first chain step producing a value wins and is recorded
//! alongside it so the verdict can be explained later. Conflicting
//! signals are never an error: the chain always lands on a concrete
//! value, possibly `Unknown`.

pub mod environment;
pub mod flavor;
pub mod flow;
pub mod import_method;
pub mod region;

use serde::{Deserialize, Serialize};

use crate::capture::NetworkFacts;
use crate::snapshot::ConfigSnapshot;
use crate::trace::PageFacts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    Test,
    Live,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    Eu,
    Us,
    Au,
    ApSoutheast,
    In,
    Unknown,
}

/// Integration flow category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flow {
    Sessions,
    Advanced,
    Unknown,
}

/// Integration UI flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flavor {
    DropIn,
    Components,
    Custom,
    Unknown,
}

/// How the SDK reached the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportMethod {
    Cdn,
    SelfHosted,
    Bundled,
}

/// Which chain step produced an attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeSource {
    ConfigToken,
    ClientKeyPrefix,
    ApiHost,
    AssetHost,
    HostRegionTable,
    SessionsEndpoint,
    SessionConfig,
    TelemetrySession,
    TelemetryFlavor,
    AssetUrlPattern,
    DomMarker,
    ConfigPresence,
    SdkLoadedNotMounted,
    AssetHostKind,
    Default,
}

/// An attribute value paired with the signal that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolved<T> {
    pub value: T,
    pub source: AttributeSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: AttributeSource) -> Self {
        Self { value, source }
    }
}

/// Derived facts about the integration, each with its winning source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplementationAttributes {
    pub environment: Resolved<Environment>,
    pub region: Resolved<Region>,
    pub flow: Resolved<Flow>,
    pub flavor: Resolved<Flavor>,
    pub import_method: Resolved<ImportMethod>,
}

/// Everything the resolvers read. All borrowed, all plain data.
#[derive(Debug, Clone, Copy)]
pub struct ResolveInput<'a> {
    pub snapshot: &'a ConfigSnapshot,
    pub network: &'a NetworkFacts,
    pub page: &'a PageFacts,
}

/// Run every chain and assemble the attribute set.
pub fn resolve_attributes(input: &ResolveInput<'_>) -> ImplementationAttributes {
    let environment = environment::resolve_environment(input);
    let region = region::resolve_region(input, environment.value);
    ImplementationAttributes {
        environment,
        region,
        flow: flow::resolve_flow(input),
        flavor: flavor::resolve_flavor(input),
        import_method: import_method::resolve_import_method(input),
    }
}
