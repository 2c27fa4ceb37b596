//! Screening strategies - seams for integrations backed by external data
//!
//! Real sanctions screening and geolocation lookups are I/O bound, so these
//! traits are async. The shipped implementations are stubs:
//! - [`StaticCountryList`] matches nationality against a fixed denylist. It
//!   is not a live sanctions-list lookup.
//! - [`UnimplementedGeoRisk`] and [`NoSanctionsScreening`] always report
//!   [`Screening::NotEvaluated`].
//!
//! `NotEvaluated` is distinct from an evaluated-but-clear outcome, so
//! callers can tell "rule absent" from "rule evaluated negative".

use std::collections::HashSet;

use async_trait::async_trait;
use vigil_core::{Finding, FindingCategory, RiskLevel, TransactionRecord};

use crate::error::ScreeningResult;
use crate::outcome::RuleOutcome;

pub const SANCTIONS_RULE: &str = "sanctions_screening";
pub const GEOGRAPHIC_RULE: &str = "geographic_risk";

/// Result of a screening strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screening {
    /// The strategy ran; the outcome may still be clear
    Evaluated(RuleOutcome),
    /// The strategy has no data source and did not evaluate anything
    NotEvaluated { rule: String, reason: String },
}

impl Screening {
    pub fn not_evaluated(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Screening::NotEvaluated {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    pub fn is_evaluated(&self) -> bool {
        matches!(self, Screening::Evaluated(_))
    }
}

/// Sanctions / watchlist screening of a person
#[async_trait]
pub trait SanctionsScreener: Send + Sync {
    /// Strategy name for logging
    fn name(&self) -> &str;

    /// Screen a person by name and nationality
    async fn screen(&self, full_name: &str, nationality: Option<&str>) -> ScreeningResult<Screening>;
}

/// Geographic risk of a subject's transactions
#[async_trait]
pub trait GeoRiskProvider: Send + Sync {
    /// Strategy name for logging
    fn name(&self) -> &str;

    /// Assess the geographic risk of a transaction list
    async fn assess(
        &self,
        subject_id: &str,
        transactions: &[TransactionRecord],
    ) -> ScreeningResult<Screening>;
}

// =============================================================================
// StaticCountryList
// =============================================================================

/// Nationality denylist
///
/// Stub for a real screening integration: it never looks at the name and
/// never calls out. Matching is case-insensitive and ignores surrounding
/// whitespace.
pub struct StaticCountryList {
    countries: HashSet<String>,
    weight: u32,
}

impl StaticCountryList {
    /// Create a denylist with the contribution applied on a hit
    pub fn new<I, S>(countries: I, weight: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            countries: countries
                .into_iter()
                .map(|c| normalize(c.as_ref()))
                .filter(|c| !c.is_empty())
                .collect(),
            weight,
        }
    }

    /// Check if a nationality is on the list
    pub fn is_listed(&self, nationality: &str) -> bool {
        self.countries.contains(&normalize(nationality))
    }
}

fn normalize(country: &str) -> String {
    country.trim().to_lowercase()
}

#[async_trait]
impl SanctionsScreener for StaticCountryList {
    fn name(&self) -> &str {
        "static_country_list"
    }

    async fn screen(&self, full_name: &str, nationality: Option<&str>) -> ScreeningResult<Screening> {
        let mut outcome = RuleOutcome::clear(SANCTIONS_RULE);

        if let Some(nationality) = nationality.filter(|n| self.is_listed(n)) {
            outcome.add(
                Finding::new(
                    FindingCategory::Sanctions,
                    RiskLevel::Critical,
                    format!("Nationality {} is on the sanctioned countries list", nationality.trim()),
                    "Escalate to the compliance officer and run full sanctions screening",
                )
                .with_evidence(format!("Name: {}", full_name))
                .with_evidence(format!("Nationality: {}", nationality.trim()))
                .with_confidence(85),
                self.weight,
            );
        }

        Ok(Screening::Evaluated(outcome))
    }
}

// =============================================================================
// Not-implemented defaults
// =============================================================================

/// Sanctions screener that screens nothing
pub struct NoSanctionsScreening;

#[async_trait]
impl SanctionsScreener for NoSanctionsScreening {
    fn name(&self) -> &str {
        "no_sanctions_screening"
    }

    async fn screen(&self, _full_name: &str, _nationality: Option<&str>) -> ScreeningResult<Screening> {
        Ok(Screening::not_evaluated(SANCTIONS_RULE, "no sanctions data source configured"))
    }
}

/// Geographic risk placeholder
///
/// Would integrate with actual geolocation data; until then every
/// assessment is reported as not evaluated and contributes nothing.
pub struct UnimplementedGeoRisk;

#[async_trait]
impl GeoRiskProvider for UnimplementedGeoRisk {
    fn name(&self) -> &str {
        "unimplemented_geo_risk"
    }

    async fn assess(
        &self,
        _subject_id: &str,
        _transactions: &[TransactionRecord],
    ) -> ScreeningResult<Screening> {
        Ok(Screening::not_evaluated(GEOGRAPHIC_RULE, "no geolocation data source configured"))
    }
}
