//! Check evaluation and scoring.
//!
//! Every check is a pure function from the full signal snapshot to
//! exactly one finding; the scorer folds findings into a 0–100 health
//! score and a qualitative tier. Policy (severity→impact mapping,
//! overrides, thresholds) lives in `catalog`, evaluation in `eval`,
//! aggregation in `score`.

pub mod catalog;
pub mod eval;
pub mod score;

pub use catalog::{Category, CheckId, GOOD_SCORE_THRESHOLD, Impact, Severity};
pub use eval::{Finding, ScanSignals, evaluate_all};
pub use score::{HealthScore, Tier, score_findings};
