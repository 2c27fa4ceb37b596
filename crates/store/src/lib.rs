//! Vigil Store - compliance record repositories
//!
//! ```text
//!  ComplianceService
//!         │  Box<dyn ComplianceRepository>
//!         ▼
//!  ┌──────────────────────┐      ┌──────────────────────────────┐
//!  │ InMemoryRepository   │      │ JsonlRepository              │
//!  │  CappedLog<Check>    │      │  checks.jsonl  (append-only) │
//!  │  CappedLog<Alert>    │      │  alerts.jsonl  (append-only) │
//!  └──────────────────────┘      │  + CappedLog cache per kind  │
//!                                └──────────────────────────────┘
//! ```
//!
//! Both keep at most the `cap` most recent records per kind (100 by
//! default). The oldest record is dropped silently once the cap is
//! exceeded; nothing is archived.

pub mod capped;
pub mod error;
pub mod jsonl;
pub mod memory;
pub mod repository;

pub use capped::{CappedLog, DEFAULT_RETENTION};
pub use error::{StoreError, StoreResult};
pub use jsonl::JsonlRepository;
pub use memory::InMemoryRepository;
pub use repository::{ComplianceRepository, Record};
