//! AML rule evaluators over a subject's transaction list
//!
//! All evaluators look at the whole list handed to them; there is no time
//! window here. Geographic risk is not here; see [`crate::screening`].

use rust_decimal::Decimal;
use vigil_core::{Finding, FindingCategory, RiskLevel, TransactionRecord};

use crate::config::AmlRules;
use crate::outcome::RuleOutcome;

pub const PATTERN_RULE: &str = "transaction_pattern";
pub const VOLUME_RULE: &str = "transaction_volume";
pub const VELOCITY_RULE: &str = "transaction_velocity";
pub const STRUCTURING_RULE: &str = "structuring";

/// Run every local (non-screening) AML evaluator
pub fn evaluate_transactions(transactions: &[TransactionRecord], rules: &AmlRules) -> Vec<RuleOutcome> {
    vec![
        check_pattern(transactions, rules),
        check_volume(transactions, rules),
        check_velocity(transactions, rules),
        check_structuring(transactions, rules),
    ]
}

fn is_round(amount: Decimal, unit: Decimal) -> bool {
    !unit.is_zero() && (amount % unit).is_zero()
}

/// Share of round-number amounts
pub fn check_pattern(transactions: &[TransactionRecord], rules: &AmlRules) -> RuleOutcome {
    let mut outcome = RuleOutcome::clear(PATTERN_RULE);
    if transactions.is_empty() {
        return outcome;
    }

    let round = transactions
        .iter()
        .filter(|tx| is_round(tx.amount, rules.round_amount_unit))
        .count();
    let ratio = Decimal::from(round) / Decimal::from(transactions.len());

    if ratio > rules.round_amount_ratio {
        outcome.add(
            Finding::new(
                FindingCategory::TransactionPattern,
                RiskLevel::Medium,
                "Unusually high share of round-number transactions",
                "Review the source of funds for round-amount transfers",
            )
            .with_evidence(format!(
                "{} of {} amounts are multiples of {}",
                round,
                transactions.len(),
                rules.round_amount_unit
            ))
            .with_confidence(60),
            rules.round_amount_weight,
        );
    }

    outcome
}

/// Sum of amounts, or `None` if it does not fit in a `Decimal`
fn total_volume(transactions: &[TransactionRecord]) -> Option<Decimal> {
    transactions
        .iter()
        .try_fold(Decimal::ZERO, |total, tx| total.checked_add(tx.amount))
}

/// Total volume
///
/// A total too large to represent is above any threshold.
pub fn check_volume(transactions: &[TransactionRecord], rules: &AmlRules) -> RuleOutcome {
    let mut outcome = RuleOutcome::clear(VOLUME_RULE);
    let total = total_volume(transactions);

    if total.map_or(true, |total| total > rules.volume_threshold) {
        let total = total.map_or_else(|| "out of range".to_string(), |t| t.to_string());
        outcome.add(
            Finding::new(
                FindingCategory::TransactionVolume,
                RiskLevel::High,
                "High transaction volume",
                "Verify the customer's source of wealth against the observed volume",
            )
            .with_evidence(format!("Total volume {} exceeds {}", total, rules.volume_threshold))
            .with_confidence(80),
            rules.volume_weight,
        );
    }

    outcome
}

/// Transaction count
pub fn check_velocity(transactions: &[TransactionRecord], rules: &AmlRules) -> RuleOutcome {
    let mut outcome = RuleOutcome::clear(VELOCITY_RULE);

    if transactions.len() > rules.velocity_tx_threshold {
        outcome.add(
            Finding::new(
                FindingCategory::TransactionVelocity,
                RiskLevel::Medium,
                "High transaction velocity",
                "Monitor account activity for rapid movement of funds",
            )
            .with_evidence(format!(
                "{} transactions exceed the limit of {}",
                transactions.len(),
                rules.velocity_tx_threshold
            ))
            .with_confidence(70),
            rules.velocity_weight,
        );
    }

    outcome
}

/// Transactions just below the reporting threshold
///
/// Fires at most once, however many transactions fall in the band.
pub fn check_structuring(transactions: &[TransactionRecord], rules: &AmlRules) -> RuleOutcome {
    let mut outcome = RuleOutcome::clear(STRUCTURING_RULE);

    let near_threshold: Vec<Decimal> = transactions
        .iter()
        .map(|tx| tx.amount)
        .filter(|amount| *amount >= rules.structuring_floor && *amount < rules.structuring_ceiling)
        .collect();

    if near_threshold.len() >= rules.structuring_tx_count {
        let amounts = near_threshold
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        outcome.add(
            Finding::new(
                FindingCategory::Structuring,
                RiskLevel::Critical,
                format!(
                    "Potential structuring: {} transactions just below the {} reporting threshold",
                    near_threshold.len(),
                    rules.structuring_ceiling
                ),
                "File a Suspicious Activity Report (SAR) and escalate to the compliance officer",
            )
            .with_evidence(format!("Near-threshold amounts: {}", amounts))
            .with_confidence(85),
            rules.structuring_weight,
        );
    }

    outcome
}
