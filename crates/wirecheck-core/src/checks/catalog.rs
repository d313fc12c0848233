//! The fixed check catalog and its scoring policy.
//!
//! Identifiers are stable external ids (`W-ENV-01` style); the warn
//! impact-override table and the "good" score threshold are part of the
//! catalog contract and must not change without a catalog version bump.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum CheckId {
    WKey01,
    WEnv01,
    WEnv02,
    WEnv03,
    WReg01,
    WFlow01,
    WCb01,
    WCb02,
    WHx01,
    WHx02,
    WVer01,
    WMnt01,
    WAn01,
}

impl CheckId {
    pub const ALL: [CheckId; 13] = [
        CheckId::WKey01,
        CheckId::WEnv01,
        CheckId::WEnv02,
        CheckId::WEnv03,
        CheckId::WReg01,
        CheckId::WFlow01,
        CheckId::WCb01,
        CheckId::WCb02,
        CheckId::WHx01,
        CheckId::WHx02,
        CheckId::WVer01,
        CheckId::WMnt01,
        CheckId::WAn01,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CheckId::WKey01 => "W-KEY-01",
            CheckId::WEnv01 => "W-ENV-01",
            CheckId::WEnv02 => "W-ENV-02",
            CheckId::WEnv03 => "W-ENV-03",
            CheckId::WReg01 => "W-REG-01",
            CheckId::WFlow01 => "W-FLOW-01",
            CheckId::WCb01 => "W-CB-01",
            CheckId::WCb02 => "W-CB-02",
            CheckId::WHx01 => "W-HX-01",
            CheckId::WHx02 => "W-HX-02",
            CheckId::WVer01 => "W-VER-01",
            CheckId::WMnt01 => "W-MNT-01",
            CheckId::WAn01 => "W-AN-01",
        }
    }

    pub fn category(self) -> Category {
        match self {
            CheckId::WKey01 => Category::Configuration,
            CheckId::WEnv01 | CheckId::WEnv02 | CheckId::WEnv03 => Category::Environment,
            CheckId::WReg01 => Category::Environment,
            CheckId::WFlow01 => Category::Integration,
            CheckId::WCb01 | CheckId::WCb02 => Category::Handlers,
            CheckId::WHx01 | CheckId::WHx02 => Category::Handlers,
            CheckId::WVer01 => Category::Assets,
            CheckId::WMnt01 => Category::Integration,
            CheckId::WAn01 => Category::Telemetry,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Configuration,
    Environment,
    Integration,
    Handlers,
    Assets,
    Telemetry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Pass,
    Warn,
    Fail,
    Notice,
    Info,
    Skip,
}

impl Severity {
    /// Whether this severity counts toward the numeric score.
    pub fn is_scoreable(self) -> bool {
        matches!(self, Severity::Pass | Severity::Warn | Severity::Fail)
    }
}

/// Normalized impact bucket used for prioritization and the tier rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Medium,
    Low,
    /// Needs a human look; excluded from scoring.
    Manual,
    None,
}

/// Severity→impact leveling with the fixed per-check warn overrides.
pub fn impact_of(id: CheckId, severity: Severity) -> Impact {
    match severity {
        Severity::Fail => Impact::High,
        Severity::Warn => warn_override(id),
        Severity::Notice => Impact::Manual,
        Severity::Pass | Severity::Info | Severity::Skip => Impact::None,
    }
}

/// Fixed warn-impact override table. Everything not listed is Medium.
fn warn_override(id: CheckId) -> Impact {
    match id {
        // A missing error handler leaves declines invisible to the shopper.
        CheckId::WCb01 => Impact::High,
        // Serving "latest" is a freshness tradeoff, not a defect.
        CheckId::WVer01 => Impact::Low,
        _ => Impact::Medium,
    }
}

/// Minimum score for the `good` tier.
pub const GOOD_SCORE_THRESHOLD: u32 = 80;
