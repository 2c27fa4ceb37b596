//! Vigil Compliance - KYC/AML check orchestration
//!
//! ```text
//!  check_kyc / check_aml
//!        │
//!        ├── local evaluators (sync, pure)
//!        ├── screening strategies (async, timeout + FailPolicy)
//!        ▼
//!  aggregate → ComplianceCheck ──► repository.append_check
//!        │
//!        └── aml && score > alert_threshold ──► AmlAlert ──► repository.append_alert
//! ```
//!
//! ## Key Components
//!
//! - [`config::ComplianceConfig`] - Configurable thresholds (not hardcoded)
//! - [`service::ComplianceService`] - Main orchestrator and review workflow
//! - [`alert::maybe_emit_alert`] - AML alert emitter
//! - [`stats::ComplianceStats`] - Dashboard counters over retained records

pub mod alert;
pub mod config;
pub mod error;
pub mod service;
pub mod stats;

pub use alert::maybe_emit_alert;
pub use config::{ComplianceConfig, FailPolicy};
pub use error::{ComplianceError, ComplianceResult};
pub use service::{CheckOutcome, ComplianceService};
pub use stats::ComplianceStats;
