//! KYC rule evaluators
//!
//! Each evaluator looks at one risk dimension of a [`KycProfile`] and returns
//! a [`RuleOutcome`]. Conditions inside one evaluator are independent and
//! their contributions add up.
//!
//! Sanctions screening is not here; see [`crate::screening`].

use chrono::NaiveDate;
use vigil_core::{Finding, FindingCategory, KycProfile, RiskLevel};

use crate::config::KycRules;
use crate::outcome::RuleOutcome;

pub const DOCUMENT_RULE: &str = "document_validity";
pub const AGE_RULE: &str = "age_verification";
pub const ADDRESS_RULE: &str = "address_verification";

/// Run every local (non-screening) KYC evaluator
pub fn evaluate_profile(profile: &KycProfile, today: NaiveDate, rules: &KycRules) -> Vec<RuleOutcome> {
    vec![
        check_document(profile.document_expiry, &profile.document_images, today, rules),
        check_age(profile.date_of_birth, today, rules),
        check_address(&profile.address, rules),
    ]
}

/// Document expiry and image presence
///
/// An expired document and a document expiring within the warning window
/// are mutually exclusive; missing images fire independently.
pub fn check_document(
    expiry: Option<NaiveDate>,
    images: &[String],
    today: NaiveDate,
    rules: &KycRules,
) -> RuleOutcome {
    let mut outcome = RuleOutcome::clear(DOCUMENT_RULE);

    if let Some(expiry) = expiry {
        let days_left = (expiry - today).num_days();
        if days_left < 0 {
            outcome.add(
                Finding::new(
                    FindingCategory::Document,
                    RiskLevel::High,
                    "Identity document has expired",
                    "Request a valid, unexpired identity document",
                )
                .with_evidence(format!("Document expired on {}", expiry))
                .with_confidence(100),
                rules.expired_document_weight,
            );
        } else if days_left <= rules.expiry_warning_days {
            outcome.add(
                Finding::new(
                    FindingCategory::Document,
                    RiskLevel::Medium,
                    "Identity document expires soon",
                    "Ask the customer to renew the document before expiry",
                )
                .with_evidence(format!("Document expires on {} ({} days left)", expiry, days_left))
                .with_confidence(100),
                rules.expiring_document_weight,
            );
        }
    }

    if images.is_empty() {
        outcome.add(
            Finding::new(
                FindingCategory::Document,
                RiskLevel::Critical,
                "No document images provided",
                "Request document images before approving the account",
            )
            .with_evidence("document_images is empty")
            .with_confidence(100),
            rules.missing_images_weight,
        );
    }

    outcome
}

/// Age in whole years using a 365.25-day year
///
/// A date of birth in the future yields a negative age.
pub fn age_in_years(date_of_birth: NaiveDate, today: NaiveDate) -> i64 {
    let days = (today - date_of_birth).num_days();
    (days * 100).div_euclid(36_525)
}

/// Minimum age and young-adult scrutiny
pub fn check_age(date_of_birth: Option<NaiveDate>, today: NaiveDate, rules: &KycRules) -> RuleOutcome {
    let mut outcome = RuleOutcome::clear(AGE_RULE);

    let Some(dob) = date_of_birth else {
        return outcome;
    };
    let age = age_in_years(dob, today);

    if age < rules.minimum_age {
        outcome.add(
            Finding::new(
                FindingCategory::Age,
                RiskLevel::Critical,
                format!("Customer is underage ({} years old)", age),
                "Reject the application: customer is below the minimum legal age",
            )
            .with_evidence(format!("Date of birth: {}", dob))
            .with_confidence(95),
            rules.underage_weight,
        );
    } else if age < rules.young_adult_age {
        outcome.add(
            Finding::new(
                FindingCategory::Age,
                RiskLevel::Medium,
                format!("Young adult customer ({} years old)", age),
                "Apply enhanced monitoring for young adult accounts",
            )
            .with_evidence(format!("Date of birth: {}", dob))
            .with_confidence(90),
            rules.young_adult_weight,
        );
    }

    outcome
}

/// Address completeness (length only, not a real address parser)
pub fn check_address(address: &str, rules: &KycRules) -> RuleOutcome {
    let mut outcome = RuleOutcome::clear(ADDRESS_RULE);
    let length = address.chars().count();

    if length < rules.minimum_address_length {
        outcome.add(
            Finding::new(
                FindingCategory::Address,
                RiskLevel::High,
                "Incomplete address",
                "Request a complete residential address with proof of address",
            )
            .with_evidence(format!("Address has {} characters", length))
            .with_confidence(70),
            rules.incomplete_address_weight,
        );
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn images() -> Vec<String> {
        vec!["passport-front.jpg".to_string()]
    }

    #[test]
    fn test_valid_document_is_clear() {
        let rules = KycRules::default();
        let outcome = check_document(Some(date(2030, 1, 1)), &images(), date(2026, 6, 1), &rules);

        assert!(outcome.is_clear());
    }

    #[test]
    fn test_expired_document() {
        let rules = KycRules::default();
        let outcome = check_document(Some(date(2026, 5, 31)), &images(), date(2026, 6, 1), &rules);

        assert_eq!(outcome.contribution, 30);
        assert_eq!(outcome.findings.len(), 1);
        assert_eq!(outcome.findings[0].severity, RiskLevel::High);
    }

    #[test]
    fn test_expiring_document() {
        let rules = KycRules::default();
        let today = date(2026, 6, 1);

        let outcome = check_document(Some(date(2026, 6, 20)), &images(), today, &rules);
        assert_eq!(outcome.contribution, 10);
        assert_eq!(outcome.findings[0].severity, RiskLevel::Medium);

        // Expiring today is not yet expired
        let outcome = check_document(Some(today), &images(), today, &rules);
        assert_eq!(outcome.contribution, 10);

        // Day 31 is outside the window
        let outcome = check_document(Some(date(2026, 7, 2)), &images(), today, &rules);
        assert!(outcome.is_clear());
    }

    #[test]
    fn test_expired_and_no_images_sum() {
        let rules = KycRules::default();
        let outcome = check_document(Some(date(2020, 1, 1)), &[], date(2026, 6, 1), &rules);

        assert_eq!(outcome.contribution, 80);
        assert_eq!(outcome.findings.len(), 2);
        assert_eq!(outcome.findings[1].severity, RiskLevel::Critical);
        assert_eq!(outcome.findings[1].description, "No document images provided");
    }

    #[test]
    fn test_missing_expiry_only_checks_images() {
        let rules = KycRules::default();
        let outcome = check_document(None, &images(), date(2026, 6, 1), &rules);
        assert!(outcome.is_clear());

        let outcome = check_document(None, &[], date(2026, 6, 1), &rules);
        assert_eq!(outcome.contribution, 50);
    }

    #[test]
    fn test_age_in_years() {
        let today = date(2026, 6, 1);
        assert_eq!(age_in_years(date(2010, 6, 1), today), 16);
        assert_eq!(age_in_years(date(2008, 5, 20), today), 18);
        assert_eq!(age_in_years(date(1990, 1, 1), today), 36);
        assert!(age_in_years(date(2027, 1, 1), today) < 0);
    }

    #[test]
    fn test_underage() {
        let rules = KycRules::default();
        let outcome = check_age(Some(date(2010, 6, 1)), date(2026, 6, 1), &rules);

        assert_eq!(outcome.contribution, 100);
        assert_eq!(outcome.findings[0].severity, RiskLevel::Critical);
        assert!(outcome.findings[0].recommendation.contains("Reject"));
    }

    #[test]
    fn test_young_adult() {
        let rules = KycRules::default();
        let outcome = check_age(Some(date(2006, 1, 1)), date(2026, 6, 1), &rules);

        assert_eq!(outcome.contribution, 20);
        assert_eq!(outcome.findings[0].severity, RiskLevel::Medium);
    }

    #[test]
    fn test_adult_and_missing_dob_are_clear() {
        let rules = KycRules::default();
        assert!(check_age(Some(date(1985, 3, 14)), date(2026, 6, 1), &rules).is_clear());
        assert!(check_age(None, date(2026, 6, 1), &rules).is_clear());
    }

    #[test]
    fn test_address_length() {
        let rules = KycRules::default();

        let outcome = check_address("ok", &rules);
        assert_eq!(outcome.contribution, 25);
        assert_eq!(outcome.findings[0].severity, RiskLevel::High);

        assert_eq!(check_address("", &rules).contribution, 25);
        assert_eq!(check_address("123456789", &rules).contribution, 25);
        assert!(check_address("1234567890", &rules).is_clear());
        assert!(check_address("12 Harbour Street, Leith", &rules).is_clear());
    }

    #[test]
    fn test_evaluate_profile_runs_all_local_rules() {
        let rules = KycRules::default();
        let profile = KycProfile::default();
        let outcomes = evaluate_profile(&profile, date(2026, 6, 1), &rules);

        let names: Vec<&str> = outcomes.iter().map(|o| o.rule.as_str()).collect();
        assert_eq!(names, vec![DOCUMENT_RULE, AGE_RULE, ADDRESS_RULE]);
        // No images + empty address
        assert_eq!(outcomes.iter().map(|o| o.contribution).sum::<u32>(), 75);
    }
}
