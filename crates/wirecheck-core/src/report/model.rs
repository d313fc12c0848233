use serde::{Deserialize, Serialize};

use crate::SCHEMA_VERSION;
use crate::checks::{Finding, HealthScore};
use crate::heuristics::Detection;
use crate::resolve::ImplementationAttributes;
use crate::snapshot::ConfigSnapshot;
use crate::util::deterministic::{sort_detections, sort_findings};

/// Top-level wirecheck report.
///
/// This struct is the stable JSON contract. It must remain deterministic
/// for identical input traces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub tool: ToolInfo,
    pub trace: TraceInfo,
    pub analysis: AnalysisInfo,
    pub snapshot: ConfigSnapshot,
    pub attributes: ImplementationAttributes,
    pub detections: Vec<Detection>,
    pub checks: ChecksInfo,
    pub health: HealthScore,
}

impl Report {
    /// Construct a report from pipeline outputs.
    ///
    /// Findings and detections are re-sorted here so report ordering never
    /// depends on evaluation order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tool: ToolInfo,
        trace: TraceInfo,
        analysis: AnalysisInfo,
        snapshot: ConfigSnapshot,
        attributes: ImplementationAttributes,
        mut detections: Vec<Detection>,
        catalog: CheckCatalogInfo,
        mut findings: Vec<Finding>,
        health: HealthScore,
    ) -> Self {
        sort_findings(&mut findings);
        sort_detections(&mut detections);

        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            trace,
            analysis,
            snapshot,
            attributes,
            detections,
            checks: ChecksInfo { catalog, findings },
            health,
        }
    }
}

/// Tool metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
    pub commit: Option<String>,
}

/// Trace metadata bound to this report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceInfo {
    pub path: Option<String>,
    pub size_bytes: u64,
    pub hash: TraceHash,
}

impl TraceInfo {
    /// Placeholder for runs where the trace never made it off disk.
    pub fn empty() -> Self {
        Self {
            path: None,
            size_bytes: 0,
            hash: TraceHash {
                algorithm: "sha256".into(),
                value: String::new(),
            },
        }
    }
}

/// Cryptographic trace fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceHash {
    pub algorithm: String,
    pub value: String,
}

/// Parsing/analysis status.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AnalysisInfo {
    pub status: String,
    pub warnings: Vec<String>,
}

impl AnalysisInfo {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
            warnings: vec![],
        }
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self {
            status: "parse_error".into(),
            warnings: vec![msg.into()],
        }
    }

    /// Analysis completed but with capture gaps worth surfacing.
    pub fn degraded(warnings: Vec<String>) -> Self {
        Self {
            status: "degraded".into(),
            warnings,
        }
    }
}

/// Check evaluation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecksInfo {
    pub catalog: CheckCatalogInfo,
    pub findings: Vec<Finding>,
}

/// Check catalog metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CheckCatalogInfo {
    pub catalog_version: String,
    pub checkset: String,
}
