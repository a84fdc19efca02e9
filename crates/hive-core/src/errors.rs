//! Unified error system for Hive
//!
//! A single error type shared by every workflow operation. The transport layer
//! maps the client-facing kinds (`NotFound`, `Validation`, `InvalidTransition`)
//! to request errors and surfaces `Internal` without its detail.

use crate::domain::AlertStatus;
use serde::{Deserialize, Serialize};

/// Unified error type for all Hive operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum HiveError {
    /// Referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `report` or `alert`
        entity: String,
        /// Identifier that was looked up
        id: String,
    },

    /// Input failed a field constraint
    #[error("invalid {field}: {reason}")]
    Validation {
        /// Offending field name
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Alert status change not present in the transition table
    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: AlertStatus,
        /// Requested status
        to: AlertStatus,
    },

    /// Storage, encoding or other internal failure
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl HiveError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid transition error
    pub fn invalid_transition(from: AlertStatus, to: AlertStatus) -> Self {
        Self::InvalidTransition { from, to }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a storage failure (reported as internal)
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Internal {
            message: format!("storage: {}", message.into()),
        }
    }

    /// Create an encoding failure (reported as internal)
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Internal {
            message: format!("encoding: {}", message.into()),
        }
    }

    /// Whether the caller caused this error and can recover from it.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Internal { .. })
    }
}

/// Standard Result type for Hive operations
pub type Result<T> = std::result::Result<T, HiveError>;

impl From<serde_json::Error> for HiveError {
    fn from(err: serde_json::Error) -> Self {
        Self::encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HiveError::not_found("report", "abc");
        assert_eq!(err.to_string(), "report not found: abc");

        let err = HiveError::invalid_transition(AlertStatus::Published, AlertStatus::Draft);
        assert_eq!(
            err.to_string(),
            "invalid status transition: published -> draft"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(HiveError::validation("area_hint", "required").is_client_error());
        assert!(HiveError::not_found("alert", "x").is_client_error());
        assert!(!HiveError::storage("disk full").is_client_error());
        assert!(matches!(
            HiveError::encoding("bad"),
            HiveError::Internal { ref message } if message == "encoding: bad"
        ));
    }
}
