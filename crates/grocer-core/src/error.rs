//! # Error Types
//!
//! Validation error type for grocer-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  grocer-core errors (this file)                                        │
//! │  └── ValidationError  - Field and form input failures                  │
//! │                                                                         │
//! │  grocer-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: keystroke ─► FieldStatus::Rejected(ValidationError)             │
//! │        submit    ─► ItemForm::validate() ─► Err(ValidationError)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators never surface these as panics. A rejected field carries the
//! error alongside its cleared buffer so the presentation layer can show it.

use thiserror::Error;

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements, either while a
/// field is being typed or when the whole form is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Field value does not have the exact length it needs.
    #[error("{field} must be exactly {expected} digits, got {actual}")]
    WrongLength {
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., non-numeric quantity, malformed date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Purchase year is older than anything the app tracks.
    #[error("year {year} is before {min}")]
    YearTooEarly { year: i32, min: i32 },

    /// Month/day don't name a real calendar day (Feb 30, month 13...).
    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    InvalidCalendarDate { year: i32, month: u32, day: u32 },

    /// Purchase date lies after today.
    #[error("date {date} is in the future")]
    FutureDate { date: String },

    /// UPC check digit does not match the first eleven digits.
    #[error("invalid UPC: expected check digit {expected}, found {found}")]
    ChecksumMismatch { expected: u8, found: u8 },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("store");
        assert_eq!(err.to_string(), "store is required");

        let err = ValidationError::ChecksumMismatch {
            expected: 2,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "invalid UPC: expected check digit 2, found 3"
        );
    }

    #[test]
    fn test_calendar_error_is_zero_padded() {
        let err = ValidationError::InvalidCalendarDate {
            year: 2023,
            month: 2,
            day: 30,
        };
        assert_eq!(err.to_string(), "2023-02-30 is not a calendar date");
    }
}
