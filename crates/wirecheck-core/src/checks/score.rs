//! Health score and tier classification over a set of findings.

use serde::{Deserialize, Serialize};

use crate::checks::catalog::{GOOD_SCORE_THRESHOLD, Impact, Severity};
use crate::checks::eval::Finding;

/// Overall integration tier, ordered best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Excellent,
    Good,
    Issues,
    Critical,
}

impl Tier {
    /// Process exit code for this tier.
    pub fn exit_code(self) -> i32 {
        match self {
            Tier::Excellent | Tier::Good => 0,
            Tier::Issues => 1,
            Tier::Critical => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    pub score: u32,
    pub pass_count: usize,
    pub warn_count: usize,
    pub fail_count: usize,
    pub total: usize,
    pub tier: Tier,
}

/// Score a finding set. Only pass/warn/fail findings are scoreable;
/// an all-skip run scores 100.
pub fn score_findings(findings: &[Finding]) -> HealthScore {
    let pass_count = count(findings, Severity::Pass);
    let warn_count = count(findings, Severity::Warn);
    let fail_count = count(findings, Severity::Fail);
    let scoreable = pass_count + warn_count + fail_count;

    let score = if scoreable == 0 {
        100
    } else {
        (100.0 * pass_count as f64 / scoreable as f64).round() as u32
    };

    HealthScore {
        score,
        pass_count,
        warn_count,
        fail_count,
        total: findings.len(),
        tier: tier_of(findings, score, warn_count, fail_count),
    }
}

fn tier_of(findings: &[Finding], score: u32, warn_count: usize, fail_count: usize) -> Tier {
    let any_high = findings
        .iter()
        .any(|f| f.impact == Impact::High && matches!(f.severity, Severity::Fail | Severity::Warn));
    if any_high {
        Tier::Critical
    } else if warn_count == 0 && fail_count == 0 {
        Tier::Excellent
    } else if score >= GOOD_SCORE_THRESHOLD {
        Tier::Good
    } else {
        Tier::Issues
    }
}

fn count(findings: &[Finding], severity: Severity) -> usize {
    findings.iter().filter(|f| f.severity == severity).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::catalog::{Category, CheckId};

    fn finding(id: &str, severity: Severity, impact: Impact) -> Finding {
        Finding {
            id: id.to_string(),
            category: Category::Configuration,
            severity,
            impact,
            title: String::new(),
            detail: None,
            remediation: None,
            reference: None,
        }
    }

    #[test]
    fn high_impact_failure_is_critical() {
        let findings = vec![
            finding("W-KEY-01", Severity::Fail, Impact::High),
            finding("W-ENV-01", Severity::Pass, Impact::None),
            finding("W-CB-02", Severity::Pass, Impact::None),
        ];
        let health = score_findings(&findings);
        assert_eq!(health.score, 67);
        assert_eq!(health.tier, Tier::Critical);
        assert_eq!(health.tier.exit_code(), 2);
    }

    #[test]
    fn high_impact_warn_is_also_critical() {
        let findings = vec![
            finding(CheckId::WCb01.as_str(), Severity::Warn, Impact::High),
            finding("W-ENV-01", Severity::Pass, Impact::None),
        ];
        assert_eq!(score_findings(&findings).tier, Tier::Critical);
    }

    #[test]
    fn clean_run_is_excellent() {
        let findings = vec![
            finding("W-KEY-01", Severity::Pass, Impact::None),
            finding("W-FLOW-01", Severity::Notice, Impact::Manual),
            finding("W-REG-01", Severity::Skip, Impact::None),
        ];
        let health = score_findings(&findings);
        assert_eq!(health.score, 100);
        assert_eq!(health.tier, Tier::Excellent);
        assert_eq!(health.tier.exit_code(), 0);
    }

    #[test]
    fn nothing_scoreable_scores_full_marks() {
        let findings = vec![
            finding("W-REG-01", Severity::Skip, Impact::None),
            finding("W-AN-01", Severity::Info, Impact::None),
        ];
        let health = score_findings(&findings);
        assert_eq!(health.score, 100);
        assert_eq!(health.tier, Tier::Excellent);
    }

    #[test]
    fn medium_warns_land_in_good_or_issues_by_score() {
        let mut findings = vec![finding("W-VER-01", Severity::Warn, Impact::Low)];
        for id in ["a", "b", "c", "d"] {
            findings.push(finding(id, Severity::Pass, Impact::None));
        }
        // 4/5 = 80, right on the threshold.
        let health = score_findings(&findings);
        assert_eq!(health.score, 80);
        assert_eq!(health.tier, Tier::Good);

        findings.pop();
        // 3/4 = 75.
        let health = score_findings(&findings);
        assert_eq!(health.score, 75);
        assert_eq!(health.tier, Tier::Issues);
        assert_eq!(health.tier.exit_code(), 1);
    }

    #[test]
    fn counts_track_only_their_severity() {
        let findings = vec![
            finding("a", Severity::Pass, Impact::None),
            finding("b", Severity::Warn, Impact::Medium),
            finding("c", Severity::Fail, Impact::High),
            finding("d", Severity::Skip, Impact::None),
        ];
        let health = score_findings(&findings);
        assert_eq!(health.pass_count, 1);
        assert_eq!(health.warn_count, 1);
        assert_eq!(health.fail_count, 1);
        assert_eq!(health.total, 4);
    }
}
