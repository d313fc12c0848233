use crate::TOOL_NAME;
use crate::checks::catalog::Severity;
use crate::report::model::Report;

pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", TOOL_NAME, report.tool.version));
    out.push_str(&format!("Trace size: {} bytes\n", report.trace.size_bytes));
    out.push_str(&format!(
        "Health: {}/100 ({:?})\n",
        report.health.score, report.health.tier
    ));
    out.push_str("Findings:\n");
    for finding in &report.checks.findings {
        if finding.severity == Severity::Pass {
            continue;
        }
        out.push_str(&format!(
            "  - {} [{:?}] {}\n",
            finding.id, finding.severity, finding.title
        ));
    }
    out
}
