//! Aggregator - combines rule outcomes into a scored assessment
//!
//! `score = clamp(sum(contributions), 0, 100)`; level and status are pure
//! functions of the score. The narrative is template text driven by the
//! most severe findings.

use vigil_core::{clamp_score, CheckStatus, Finding, RiskLevel};

use crate::outcome::RuleOutcome;

/// Combined result of all rules for one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub score: u8,
    pub risk_level: RiskLevel,
    pub status: CheckStatus,
    pub findings: Vec<Finding>,
    pub narrative: String,
    pub recommendations: Vec<String>,
}

/// Aggregate rule outcomes in evaluation order
pub fn aggregate(outcomes: impl IntoIterator<Item = RuleOutcome>) -> Assessment {
    let mut raw: u32 = 0;
    let mut findings = Vec::new();

    for outcome in outcomes {
        if !outcome.is_clear() {
            tracing::debug!(
                rule = %outcome.rule,
                contribution = outcome.contribution,
                findings = outcome.findings.len(),
                "Rule fired"
            );
        }
        raw = raw.saturating_add(outcome.contribution);
        findings.extend(outcome.findings);
    }

    let score = clamp_score(raw);
    let narrative = narrative(&findings);
    let recommendations = recommendations(&findings);

    Assessment {
        score,
        risk_level: RiskLevel::from_score(score),
        status: CheckStatus::from_score(score),
        findings,
        narrative,
        recommendations,
    }
}

/// Template narrative, led by the first critical finding, else the first
/// high finding. Never empty.
pub fn narrative(findings: &[Finding]) -> String {
    let first_at = |level: RiskLevel| findings.iter().find(|f| f.severity == level);

    if let Some(critical) = first_at(RiskLevel::Critical) {
        let others = findings.len() - 1;
        format!(
            "Critical risk identified: {}. {} additional finding(s) recorded. Immediate manual review is required.",
            critical.description, others
        )
    } else if let Some(high) = first_at(RiskLevel::High) {
        let others = findings.len() - 1;
        format!(
            "High risk indicator detected: {}. {} additional finding(s) recorded. Enhanced due diligence is recommended.",
            high.description, others
        )
    } else if !findings.is_empty() {
        format!(
            "Moderate risk profile with {} minor finding(s). Standard monitoring applies.",
            findings.len()
        )
    } else {
        "No significant risk indicators identified. Low risk profile.".to_string()
    }
}

/// Finding recommendations, de-duplicated in order of first appearance
pub fn recommendations(findings: &[Finding]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for finding in findings {
        if !finding.recommendation.is_empty() && !out.contains(&finding.recommendation) {
            out.push(finding.recommendation.clone());
        }
    }
    out
}
