//! Vigil Core - Domain types
//!
//! This crate contains the fundamental types shared by the compliance engine:
//! - [`RiskLevel`], [`CheckStatus`]: score-derived buckets with fixed thresholds
//! - [`Finding`]: an atomic observation produced by a rule
//! - [`ComplianceCheck`]: the persisted result of one KYC or AML evaluation
//! - [`AmlAlert`]: companion record for high-scoring AML checks
//! - [`KycProfile`], [`TransactionRecord`]: evaluation inputs

pub mod alert;
pub mod check;
pub mod finding;
pub mod input;
pub mod risk;

pub use alert::{AlertStatus, AmlAlert};
pub use check::{CheckType, ComplianceCheck, ReviewDecision};
pub use finding::{Finding, FindingCategory};
pub use input::{KycProfile, TransactionRecord};
pub use risk::{clamp_score, CheckStatus, RiskLevel, MAX_SCORE};
