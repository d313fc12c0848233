//! Deterministic ordering helpers.
//!
//! Report ordering is part of the output contract: identical traces must
//! always produce byte-identical reports, regardless of evaluation order.

use crate::checks::Finding;
use crate::heuristics::Detection;

/// Sort findings by check id.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| a.id.cmp(&b.id));
}

/// Sort detections by `(handler, offset)`.
///
/// Offset breaks ties between multiple hits inside one handler body.
pub fn sort_detections(detections: &mut [Detection]) {
    detections.sort_by(|a, b| (a.handler.as_str(), a.offset).cmp(&(b.handler.as_str(), b.offset)));
}
