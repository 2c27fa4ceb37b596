//! Repository interface
//!
//! Evaluator logic never touches storage directly; the service receives a
//! `ComplianceRepository` and can be backed by any store that honors the
//! per-kind retention cap.

use serde::de::DeserializeOwned;
use serde::Serialize;
use vigil_core::{AmlAlert, ComplianceCheck};

use crate::error::StoreResult;

/// A stored record with a stable ID
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync {
    /// Record kind for error messages and logs
    const KIND: &'static str;

    fn id(&self) -> &str;
}

impl Record for ComplianceCheck {
    const KIND: &'static str = "check";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for AmlAlert {
    const KIND: &'static str = "alert";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Storage for checks and alerts
///
/// `recent_*` returns records oldest first, most recent last. With a
/// `limit`, only the last `limit` records are returned.
pub trait ComplianceRepository: Send + Sync {
    /// Append a check, evicting the oldest one past the cap
    fn append_check(&mut self, check: ComplianceCheck) -> StoreResult<()>;

    /// Most recent checks
    fn recent_checks(&self, limit: Option<usize>) -> StoreResult<Vec<ComplianceCheck>>;

    /// Look up a retained check by ID
    fn find_check(&self, id: &str) -> StoreResult<Option<ComplianceCheck>>;

    /// Replace a retained check with an updated copy (same ID)
    fn replace_check(&mut self, check: ComplianceCheck) -> StoreResult<()>;

    /// Append an alert, evicting the oldest one past the cap
    fn append_alert(&mut self, alert: AmlAlert) -> StoreResult<()>;

    /// Most recent alerts
    fn recent_alerts(&self, limit: Option<usize>) -> StoreResult<Vec<AmlAlert>>;

    /// Look up a retained alert by ID
    fn find_alert(&self, id: &str) -> StoreResult<Option<AmlAlert>>;

    /// Replace a retained alert with an updated copy (same ID)
    fn replace_alert(&mut self, alert: AmlAlert) -> StoreResult<()>;
}
