//! Unified error hierarchy for planrs
//!
//! A single crate-level error enum in the trainrs mold; modules that can
//! fail return `Result<T>` from here.

use thiserror::Error;

/// Top-level error type for all planrs operations
#[derive(Debug, Error)]
pub enum PlanrsError {
    /// Persisted blob could not be read or written
    #[error("Store error: {0}")]
    Store(String),

    /// Data failed a structural validation rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// A referenced record does not exist
    #[error("Not found: {kind} {id}")]
    NotFound { kind: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV export errors
    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for planrs operations
pub type Result<T> = std::result::Result<T, PlanrsError>;

impl PlanrsError {
    /// True when the error means a lookup missed rather than a failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, PlanrsError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        let err = PlanrsError::NotFound {
            kind: "exercise",
            id: "123".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Not found: exercise 123");

        let err = PlanrsError::Validation("empty name".to_string());
        assert!(!err.is_not_found());
    }
}
