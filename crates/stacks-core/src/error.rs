//! # Error Types
//!
//! Domain-specific error types for stacks-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stacks-core errors (this file)                                        │
//! │  ├── CoreError        - Lending rule violations, lookups that missed   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  stacks-db errors (separate crate)                                     │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── ServiceError     - CoreError | DbError from a workflow call       │
//! │                                                                         │
//! │  Console errors (in app)                                               │
//! │  └── Failure          - What the user sees                             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → Failure → stdout   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use thiserror::Error;

use crate::dates;

// =============================================================================
// Core Error
// =============================================================================

/// Lending and lookup errors.
///
/// None of these are fatal: the console reports them and returns to the menu.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No book with this ISBN is cataloged.
    #[error("Book not found: {0}")]
    BookNotFound(String),

    /// No registered user with this email.
    #[error("Patron not found: {0}")]
    PatronNotFound(String),

    /// The patron holds no outstanding loan for this ISBN.
    #[error("No loan of {isbn} recorded for {email}")]
    LoanNotFound { isbn: String, email: String },

    /// Every copy is out on loan.
    ///
    /// ## User Workflow
    /// ```text
    /// Assign book (isbn: 978-0-13-110362-7)
    ///      │
    ///      ▼
    /// inventory.quantity = 0
    ///      │
    ///      ▼
    /// earliest due date among current loans = 04/02/2024
    ///      │
    ///      ▼
    /// OutOfStock { next_available: Some(2024-04-02) }
    /// ```
    #[error("{isbn} is out of stock{}", next_available_suffix(.next_available))]
    OutOfStock {
        isbn: String,
        next_available: Option<NaiveDate>,
    },

    /// The patron already holds a copy of this book.
    #[error("{email} already has {isbn} on loan")]
    AlreadyBorrowed { isbn: String, email: String },

    /// A recommendation was requested for a subject with no books.
    #[error("No books in subject '{0}'")]
    NoBooksInSubject(String),

    /// Login failed. Deliberately does not say whether the email exists.
    #[error("Could not authenticate those credentials")]
    AuthenticationFailed,

    /// The loan policy produced a date or charge that cannot be represented.
    #[error("Loan policy out of range: {0}")]
    PolicyOutOfRange(&'static str),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn next_available_suffix(date: &Option<NaiveDate>) -> String {
    match date {
        Some(date) => format!("; next copy due back {}", dates::format_date(*date)),
        None => String::new(),
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any store access.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., bad email, bad date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Duplicate value (e.g., email already registered).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

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

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_stock_message_includes_next_date() {
        let err = CoreError::OutOfStock {
            isbn: "978-0-13-110362-7".to_string(),
            next_available: NaiveDate::from_ymd_opt(2024, 4, 2),
        };
        assert_eq!(
            err.to_string(),
            "978-0-13-110362-7 is out of stock; next copy due back 04/02/2024"
        );
    }

    #[test]
    fn test_out_of_stock_message_without_loans() {
        let err = CoreError::OutOfStock {
            isbn: "111".to_string(),
            next_available: None,
        };
        assert_eq!(err.to_string(), "111 is out of stock");
    }

    #[test]
    fn test_authentication_failure_is_generic() {
        let msg = CoreError::AuthenticationFailed.to_string();
        assert!(!msg.contains('@'));
        assert!(!msg.to_lowercase().contains("password"));
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::required("email").to_string(),
            "email is required"
        );
        let err = ValidationError::Duplicate {
            field: "email".to_string(),
            value: "ada@example.com".to_string(),
        };
        assert_eq!(err.to_string(), "email 'ada@example.com' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("isbn").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
