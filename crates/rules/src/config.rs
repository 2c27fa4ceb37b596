//! Rule thresholds and weights
//!
//! Every threshold is a serde field with its own default function, so a
//! partial JSON document only overrides what it names.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Thresholds for the KYC evaluators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KycRules {
    // === Document validity ===
    /// Contribution when the identity document has expired
    #[serde(default = "default_expired_document_weight")]
    pub expired_document_weight: u32,

    /// Days before expiry at which a document counts as "expiring soon"
    #[serde(default = "default_expiry_warning_days")]
    pub expiry_warning_days: i64,

    /// Contribution when the document expires within the warning window
    #[serde(default = "default_expiring_document_weight")]
    pub expiring_document_weight: u32,

    /// Contribution when no document images were uploaded
    #[serde(default = "default_missing_images_weight")]
    pub missing_images_weight: u32,

    // === Age ===
    /// Minimum legal age
    #[serde(default = "default_minimum_age")]
    pub minimum_age: i64,

    /// Contribution for an underage subject
    #[serde(default = "default_underage_weight")]
    pub underage_weight: u32,

    /// Ages in `[minimum_age, young_adult_age)` get extra scrutiny
    #[serde(default = "default_young_adult_age")]
    pub young_adult_age: i64,

    /// Contribution for a young adult
    #[serde(default = "default_young_adult_weight")]
    pub young_adult_weight: u32,

    // === Address ===
    /// Addresses shorter than this (in characters) are incomplete
    #[serde(default = "default_minimum_address_length")]
    pub minimum_address_length: usize,

    /// Contribution for an incomplete address
    #[serde(default = "default_incomplete_address_weight")]
    pub incomplete_address_weight: u32,

    // === Sanctions ===
    /// Nationalities on the static denylist
    #[serde(default = "default_sanctioned_countries")]
    pub sanctioned_countries: Vec<String>,

    /// Contribution for a sanctions hit
    #[serde(default = "default_sanctions_weight")]
    pub sanctions_weight: u32,
}

/// Thresholds for the AML evaluators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmlRules {
    // === Round amounts ===
    /// Amounts that are exact multiples of this unit count as round
    #[serde(default = "default_round_amount_unit")]
    pub round_amount_unit: Decimal,

    /// Share of round amounts above which the pattern rule fires
    #[serde(default = "default_round_amount_ratio")]
    pub round_amount_ratio: Decimal,

    #[serde(default = "default_round_amount_weight")]
    pub round_amount_weight: u32,

    // === Volume ===
    /// Total volume above which the volume rule fires
    #[serde(default = "default_volume_threshold")]
    pub volume_threshold: Decimal,

    #[serde(default = "default_volume_weight")]
    pub volume_weight: u32,

    // === Velocity ===
    /// Transaction count above which the velocity rule fires
    #[serde(default = "default_velocity_tx_threshold")]
    pub velocity_tx_threshold: usize,

    #[serde(default = "default_velocity_weight")]
    pub velocity_weight: u32,

    // === Structuring ===
    /// Lower bound (inclusive) of the near-threshold band
    #[serde(default = "default_structuring_floor")]
    pub structuring_floor: Decimal,

    /// Reporting threshold, upper bound (exclusive) of the band
    #[serde(default = "default_structuring_ceiling")]
    pub structuring_ceiling: Decimal,

    /// Number of near-threshold transactions that triggers the rule
    #[serde(default = "default_structuring_tx_count")]
    pub structuring_tx_count: usize,

    #[serde(default = "default_structuring_weight")]
    pub structuring_weight: u32,
}

// Default value functions for serde
fn default_expired_document_weight() -> u32 {
    30
}

fn default_expiry_warning_days() -> i64 {
    30
}

fn default_expiring_document_weight() -> u32 {
    10
}

fn default_missing_images_weight() -> u32 {
    50
}

fn default_minimum_age() -> i64 {
    18
}

fn default_underage_weight() -> u32 {
    100
}

fn default_young_adult_age() -> i64 {
    21
}

fn default_young_adult_weight() -> u32 {
    20
}

fn default_minimum_address_length() -> usize {
    10
}

fn default_incomplete_address_weight() -> u32 {
    25
}

fn default_sanctioned_countries() -> Vec<String> {
    ["North Korea", "Iran", "Syria", "Cuba"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_sanctions_weight() -> u32 {
    80
}

fn default_round_amount_unit() -> Decimal {
    Decimal::new(1_000, 0)
}

fn default_round_amount_ratio() -> Decimal {
    Decimal::new(7, 1) // 0.7
}

fn default_round_amount_weight() -> u32 {
    15
}

fn default_volume_threshold() -> Decimal {
    Decimal::new(1_000_000, 0)
}

fn default_volume_weight() -> u32 {
    25
}

fn default_velocity_tx_threshold() -> usize {
    50
}

fn default_velocity_weight() -> u32 {
    15
}

fn default_structuring_floor() -> Decimal {
    Decimal::new(9_000, 0)
}

fn default_structuring_ceiling() -> Decimal {
    Decimal::new(10_000, 0)
}

fn default_structuring_tx_count() -> usize {
    3
}

fn default_structuring_weight() -> u32 {
    50
}

impl Default for KycRules {
    fn default() -> Self {
        Self {
            expired_document_weight: default_expired_document_weight(),
            expiry_warning_days: default_expiry_warning_days(),
            expiring_document_weight: default_expiring_document_weight(),
            missing_images_weight: default_missing_images_weight(),
            minimum_age: default_minimum_age(),
            underage_weight: default_underage_weight(),
            young_adult_age: default_young_adult_age(),
            young_adult_weight: default_young_adult_weight(),
            minimum_address_length: default_minimum_address_length(),
            incomplete_address_weight: default_incomplete_address_weight(),
            sanctioned_countries: default_sanctioned_countries(),
            sanctions_weight: default_sanctions_weight(),
        }
    }
}

impl Default for AmlRules {
    fn default() -> Self {
        Self {
            round_amount_unit: default_round_amount_unit(),
            round_amount_ratio: default_round_amount_ratio(),
            round_amount_weight: default_round_amount_weight(),
            volume_threshold: default_volume_threshold(),
            volume_weight: default_volume_weight(),
            velocity_tx_threshold: default_velocity_tx_threshold(),
            velocity_weight: default_velocity_weight(),
            structuring_floor: default_structuring_floor(),
            structuring_ceiling: default_structuring_ceiling(),
            structuring_tx_count: default_structuring_tx_count(),
            structuring_weight: default_structuring_weight(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_kyc_rules() {
        let rules = KycRules::default();

        assert_eq!(rules.expired_document_weight, 30);
        assert_eq!(rules.expiry_warning_days, 30);
        assert_eq!(rules.expiring_document_weight, 10);
        assert_eq!(rules.missing_images_weight, 50);
        assert_eq!(rules.minimum_age, 18);
        assert_eq!(rules.underage_weight, 100);
        assert_eq!(rules.young_adult_age, 21);
        assert_eq!(rules.young_adult_weight, 20);
        assert_eq!(rules.minimum_address_length, 10);
        assert_eq!(rules.incomplete_address_weight, 25);
        assert_eq!(rules.sanctions_weight, 80);
        assert!(rules.sanctioned_countries.contains(&"North Korea".to_string()));
    }

    #[test]
    fn test_default_aml_rules() {
        let rules = AmlRules::default();

        assert_eq!(rules.round_amount_unit, dec!(1000));
        assert_eq!(rules.round_amount_ratio, dec!(0.7));
        assert_eq!(rules.volume_threshold, dec!(1000000));
        assert_eq!(rules.velocity_tx_threshold, 50);
        assert_eq!(rules.structuring_floor, dec!(9000));
        assert_eq!(rules.structuring_ceiling, dec!(10000));
        assert_eq!(rules.structuring_tx_count, 3);
        assert_eq!(rules.structuring_weight, 50);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "volume_threshold": "250000", "velocity_tx_threshold": 20 }"#;
        let rules: AmlRules = serde_json::from_str(json).unwrap();

        assert_eq!(rules.volume_threshold, dec!(250000));
        assert_eq!(rules.velocity_tx_threshold, 20);
        assert_eq!(rules.structuring_floor, dec!(9000)); // default
    }
}
