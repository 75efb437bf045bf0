//! Core error types for the Martingale backend.
//!
//! These cover the strategy document store. Market data errors live in the
//! `martingale-market-data` crate and are mapped separately by the server.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the strategy store.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No strategy document found")]
    StrategyNotFound,

    #[error("Backup not found: {0}")]
    BackupNotFound(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Strategy store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Strategy document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Strategy store lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Whether the error means "the requested document or backup is absent".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StrategyNotFound | Self::BackupNotFound(_))
    }
}

/// Validation errors for caller-supplied input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Strategy document must be a JSON object")]
    NotAnObject,

    #[error("Invalid backup filename: {0}")]
    InvalidFilename(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(Error::StrategyNotFound.is_not_found());
        assert!(Error::BackupNotFound("x.json".to_string()).is_not_found());
        assert!(!Error::from(ValidationError::NotAnObject).is_not_found());
        assert!(!Error::LockPoisoned.is_not_found());
    }

    #[test]
    fn test_error_display() {
        let error = Error::from(ValidationError::InvalidFilename("../etc".to_string()));
        assert_eq!(
            error.to_string(),
            "Input validation failed: Invalid backup filename: ../etc"
        );
        assert_eq!(
            Error::BackupNotFound("strategy-x.json".to_string()).to_string(),
            "Backup not found: strategy-x.json"
        );
    }
}
