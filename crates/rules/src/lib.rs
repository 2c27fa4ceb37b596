//! Vigil Rules - KYC/AML rule evaluators
//!
//! ```text
//!  KycProfile / [TransactionRecord]
//!          │
//!          ├── kyc::check_document ─┐
//!          ├── kyc::check_age ──────┤
//!          ├── kyc::check_address ──┤   RuleOutcome { findings, contribution }
//!          ├── SanctionsScreener ───┤
//!          │                        │
//!          ├── aml::check_pattern ──┤
//!          ├── aml::check_volume ───┤
//!          ├── aml::check_velocity ─┤
//!          ├── GeoRiskProvider ─────┤
//!          └── aml::check_structuring
//!                                   ▼
//!                      aggregate::aggregate → Assessment
//! ```
//!
//! Evaluators are synchronous pure functions of their input and a
//! threshold table. The two integrations that would need external data
//! (sanctions lists, geolocation) sit behind async strategy traits in
//! [`screening`].

pub mod aggregate;
pub mod aml;
pub mod config;
pub mod error;
pub mod kyc;
pub mod outcome;
pub mod screening;

pub use aggregate::{aggregate, Assessment};
pub use config::{AmlRules, KycRules};
pub use error::{ScreeningError, ScreeningResult};
pub use outcome::RuleOutcome;
pub use screening::{
    GeoRiskProvider, NoSanctionsScreening, SanctionsScreener, Screening, StaticCountryList,
    UnimplementedGeoRisk,
};
