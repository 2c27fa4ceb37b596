//! Compliance errors

use thiserror::Error;
use vigil_core::AlertStatus;
use vigil_store::StoreError;

/// Errors from the Compliance Service
#[derive(Debug, Error)]
pub enum ComplianceError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Check not found: {0}")]
    CheckNotFound(String),

    #[error("Alert not found: {0}")]
    AlertNotFound(String),

    #[error("Check already reviewed: {0}")]
    CheckAlreadyReviewed(String),

    #[error("Alert already closed: {0}")]
    AlertClosed(String),

    #[error("Invalid alert transition for {id}: {from} -> {to}")]
    InvalidAlertTransition {
        id: String,
        from: AlertStatus,
        to: AlertStatus,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type for compliance operations
pub type ComplianceResult<T> = Result<T, ComplianceError>;
