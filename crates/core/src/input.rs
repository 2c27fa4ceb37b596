//! Evaluation inputs
//!
//! Every field is optional on the wire. Missing or malformed fields degrade
//! into defaults so that evaluation never fails on bad input: a missing
//! image list is an empty list (and is reported as a finding), a missing
//! date simply skips the date-based rule.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity data submitted for a KYC check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KycProfile {
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub address: String,
    pub document_type: Option<String>,
    pub document_number: Option<String>,
    pub document_expiry: Option<NaiveDate>,
    /// References (URLs or storage keys) to uploaded document images
    pub document_images: Vec<String>,
}

/// One transaction submitted for an AML check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Transaction type (deposit, withdrawal, trade, ...)
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl TransactionRecord {
    pub fn new(amount: Decimal, date: DateTime<Utc>, kind: impl Into<String>) -> Self {
        Self {
            amount,
            date: Some(date),
            kind: kind.into(),
        }
    }
}
