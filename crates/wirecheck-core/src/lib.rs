pub mod capture;
pub mod checks;
pub mod heuristics;
pub mod known;
pub mod report;
pub mod resolve;
pub mod snapshot;
pub mod trace;
pub mod util;
pub mod walker;

use std::path::Path;

use crate::capture::CaptureSession;
use crate::capture::shape;
use crate::checks::{ScanSignals, evaluate_all, score_findings};
use crate::heuristics::{Detection, scan_handler};
use crate::known::ConfigField;
use crate::report::model::{AnalysisInfo, CheckCatalogInfo, Report, ToolInfo, TraceInfo};
use crate::resolve::{ResolveInput, resolve_attributes};
use crate::trace::{CaptureTrace, parse_trace, read_trace};

pub const TOOL_NAME: &str = "wirecheck";

/// JSON schema version of wirecheck reports.
/// Bump only when the report contract changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";

pub const CHECK_CATALOG_VERSION: &str = "0.1.0";

/// Analyze a capture trace file and produce a full report.
///
/// A trace that fails to parse still yields a report, carrying a
/// `parse_error` analysis status and an all-skip finding set.
pub fn inspect(path: &Path, tool: ToolInfo) -> anyhow::Result<Report> {
    let ctx = read_trace(path)?;

    match parse_trace(&ctx.bytes) {
        Ok(trace) => Ok(inspect_trace(&trace, ctx.into_trace_info(), tool)),
        Err(err) => {
            let analysis = AnalysisInfo::parse_error(err.to_string());
            let trace = CaptureTrace::default();
            let mut report = inspect_trace(&trace, ctx.into_trace_info(), tool);
            report.analysis = analysis;
            Ok(report)
        }
    }
}

/// Run the full analysis pipeline over an already-parsed trace.
pub fn inspect_trace(trace: &CaptureTrace, trace_info: TraceInfo, tool: ToolInfo) -> Report {
    let mut session = CaptureSession::new();
    session.install();
    for event in &trace.events {
        session.observe(event);
    }

    let mut warnings = Vec::new();

    // Graph-walk fallback only when the hooks produced no primary
    // fragment at all.
    if !session.captured_anything() {
        match trace.ui_tree.as_ref().and_then(walker::walk_fallback) {
            Some(fragment) => {
                warnings.push("configuration recovered via page-graph fallback".into());
                session.absorb(&fragment);
            }
            None => warnings.push("no configuration captured".into()),
        }
    }

    let snapshot = session.snapshot();
    let network = session.network().clone();

    let attributes = resolve_attributes(&ResolveInput {
        snapshot: &snapshot,
        network: &network,
        page: &trace.page,
    });

    let detections = collect_detections(trace, &snapshot);

    let findings = evaluate_all(&ScanSignals {
        snapshot: &snapshot,
        attributes: &attributes,
        network: &network,
        page: &trace.page,
        detections: &detections,
    });
    let health = score_findings(&findings);

    let analysis = if warnings.is_empty() {
        AnalysisInfo::ok()
    } else {
        AnalysisInfo::degraded(warnings)
    };

    Report::new(
        tool,
        trace_info,
        analysis,
        snapshot,
        attributes,
        detections,
        CheckCatalogInfo {
            catalog_version: CHECK_CATALOG_VERSION.to_string(),
            checkset: "default".to_string(),
        },
        findings,
        health,
    )
}

/// Gather handler sources from the adapter's dump and from captured
/// callback fields, then scan each. The dump wins on name collisions.
fn collect_detections(trace: &CaptureTrace, snapshot: &snapshot::ConfigSnapshot) -> Vec<Detection> {
    let mut detections = Vec::new();

    for (name, source) in &trace.handlers {
        detections.extend(scan_handler(name, source));
    }

    for field in ConfigField::ALL {
        if !field.is_callback() || trace.handlers.contains_key(field.key()) {
            continue;
        }
        if let Some(source) = snapshot.get(field).and_then(shape::handler_source) {
            detections.extend(scan_handler(field.key(), source));
        }
    }

    detections
}
