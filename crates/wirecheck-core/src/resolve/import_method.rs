//! Import-method chain, classified from which kind of host served the
//! SDK assets: vendor asset CDN → any other host → nothing detected,
//! which means the SDK arrived inside the integrator's own bundle.

use crate::capture::SdkAssetOrigin;
use crate::known::{self, HostKind};
use crate::resolve::{AttributeSource, ImportMethod, Resolved, ResolveInput};

pub fn resolve_import_method(input: &ResolveInput<'_>) -> Resolved<ImportMethod> {
    let origin = input.network.sdk_asset_origin.or_else(|| script_tag_origin(input));

    match origin {
        Some(SdkAssetOrigin::VendorCdn) => {
            Resolved::new(ImportMethod::Cdn, AttributeSource::AssetHostKind)
        }
        Some(SdkAssetOrigin::Other) => {
            Resolved::new(ImportMethod::SelfHosted, AttributeSource::AssetHostKind)
        }
        None => Resolved::new(ImportMethod::Bundled, AttributeSource::Default),
    }
}

/// The script tag the adapter found, when network interception saw no
/// SDK asset itself (e.g. cached load).
fn script_tag_origin(input: &ResolveInput<'_>) -> Option<SdkAssetOrigin> {
    let url = input.page.sdk_script_url.as_deref()?;
    let host = url.split_once("://").map_or(url, |(_, rest)| rest);
    let host = host.split(['/', '?', ':']).next()?;
    match known::classify_host(host).map(|f| f.kind) {
        Some(HostKind::AssetCdn) => Some(SdkAssetOrigin::VendorCdn),
        _ => Some(SdkAssetOrigin::Other),
    }
}
