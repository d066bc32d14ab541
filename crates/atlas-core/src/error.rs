//! # Error Types
//!
//! Domain error types for atlas-core.
//!
//! ## Error Flow
//! ```text
//! ValidationError (this crate)
//!      │  #[from]
//!      ▼
//! OrderError (atlas-orders)  ←  DbError (atlas-db)
//!      │
//!      ▼
//! Caller-facing rejection with a stable kind and message
//! ```
//!
//! Errors are enum variants with context fields, never bare strings, so the
//! service layer can map them to stable rejection kinds without parsing
//! messages.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation failures. Raised before any mutation occurs; a request
/// that fails validation leaves no trace in the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. not a UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Too many entries in a collection field.
    #[error("{field} must have at most {max} entries")]
    TooManyEntries { field: String, max: usize },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "companyId".to_string(),
        };
        assert_eq!(err.to_string(), "companyId is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }
}
