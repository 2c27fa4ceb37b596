//! Screening errors

use thiserror::Error;

/// Errors from external screening strategies
#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("External service timeout after {0}ms")]
    Timeout(u64),
}

/// Result type for screening operations
pub type ScreeningResult<T> = Result<T, ScreeningError>;
