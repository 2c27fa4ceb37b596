//! Rule outcome - what a single evaluator contributes to a check

use vigil_core::Finding;

/// Findings and raw score contribution of one rule
///
/// Contributions are unbounded here; clamping happens in the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Rule name, e.g. `"document_validity"`
    pub rule: String,
    pub findings: Vec<Finding>,
    pub contribution: u32,
}

impl RuleOutcome {
    /// An outcome with no findings and zero contribution
    pub fn clear(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            findings: Vec::new(),
            contribution: 0,
        }
    }

    /// Record a finding together with its score contribution
    pub fn add(&mut self, finding: Finding, contribution: u32) {
        self.findings.push(finding);
        self.contribution = self.contribution.saturating_add(contribution);
    }

    /// Builder form of [`RuleOutcome::add`]
    pub fn with(mut self, finding: Finding, contribution: u32) -> Self {
        self.add(finding, contribution);
        self
    }

    /// True when the rule found nothing
    pub fn is_clear(&self) -> bool {
        self.findings.is_empty() && self.contribution == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{FindingCategory, RiskLevel};

    #[test]
    fn test_contributions_sum() {
        let mut outcome = RuleOutcome::clear("document_validity");
        assert!(outcome.is_clear());

        outcome.add(Finding::new(FindingCategory::Document, RiskLevel::High, "a", "r"), 30);
        outcome.add(Finding::new(FindingCategory::Document, RiskLevel::Critical, "b", "r"), 50);

        assert_eq!(outcome.contribution, 80);
        assert_eq!(outcome.findings.len(), 2);
        assert!(!outcome.is_clear());
    }
}
