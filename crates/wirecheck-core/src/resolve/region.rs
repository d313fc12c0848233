//! Region chain: config-token suffix → host region table → unknown.
//!
//! Region is meaningless on the test tier: when the resolved
//! environment is `Test` every other signal is ignored.

use crate::known::{self, ConfigField};
use crate::resolve::{AttributeSource, Environment, Region, Resolved, ResolveInput};

pub fn resolve_region(input: &ResolveInput<'_>, environment: Environment) -> Resolved<Region> {
    if environment == Environment::Test {
        return Resolved::new(Region::Unknown, AttributeSource::Default);
    }
    if let Some(region) = token_suffix(input) {
        return Resolved::new(region, AttributeSource::ConfigToken);
    }
    if let Some(region) = input.network.api_region.or(input.network.asset_region) {
        return Resolved::new(region, AttributeSource::HostRegionTable);
    }
    Resolved::new(Region::Unknown, AttributeSource::Default)
}

fn token_suffix(input: &ResolveInput<'_>) -> Option<Region> {
    let token = input.snapshot.get_str(ConfigField::Environment)?;
    known::region_from_token(token.strip_prefix("live-")?)
}
