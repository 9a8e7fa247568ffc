//! # Console Errors
//!
//! What the person at the terminal sees when something goes wrong.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Console                            │
//! │                                                                         │
//! │  Command (e.g. assign book)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ServiceError::Domain(OutOfStock) ──┐                                   │
//! │  ServiceError::Store(QueryFailed) ──┼──► Failure { code, message }     │
//! │  ValidationError ───────────────────┘            │                      │
//! │                                                  ▼                      │
//! │                                  printed, back to the same menu        │
//! │                                                                         │
//! │  io::Error on stdin/stdout ──► ShellError::Io ──► session ends         │
//! │  stdin closed              ──► ShellError::Closed ──► treated as quit  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store errors are logged in full and shown to the user as a generic
//! message.

use stacks_core::{CoreError, ValidationError};
use stacks_db::{DbError, ServiceError};

/// A recoverable failure of one menu action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Machine-readable category, used by tests and logs.
    pub code: ErrorCode,

    /// Message shown at the terminal.
    pub message: String,
}

/// Failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Book, patron or loan not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// No copy available
    OutOfStock,

    /// Patron already holds this book
    AlreadyBorrowed,

    /// Login rejected
    NotAuthenticated,

    /// Empty subject, nothing to recommend
    NothingToRecommend,

    /// Configured loan period or charge gave an unrepresentable result
    PolicyOutOfRange,

    /// Database operation failed
    DatabaseError,
}

impl Failure {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Failure {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Failure::new(ErrorCode::ValidationError, message)
    }
}

impl From<DbError> for Failure {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                Failure::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::UniqueViolation { field, .. } => Failure::new(
                ErrorCode::ValidationError,
                format!("{} already exists", field),
            ),
            unavailable @ (DbError::ConnectionFailed(_) | DbError::PoolExhausted) => {
                tracing::error!(error = %unavailable, "Database unavailable");
                Failure::new(ErrorCode::DatabaseError, "The library database is unavailable")
            }
            other => {
                tracing::error!(error = %other, "Database operation failed");
                Failure::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for Failure {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::BookNotFound(_)
            | CoreError::PatronNotFound(_)
            | CoreError::LoanNotFound { .. } => ErrorCode::NotFound,
            CoreError::OutOfStock { .. } => ErrorCode::OutOfStock,
            CoreError::AlreadyBorrowed { .. } => ErrorCode::AlreadyBorrowed,
            CoreError::NoBooksInSubject(_) => ErrorCode::NothingToRecommend,
            CoreError::AuthenticationFailed => ErrorCode::NotAuthenticated,
            CoreError::PolicyOutOfRange(_) => ErrorCode::PolicyOutOfRange,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        let message = match err {
            CoreError::Validation(e) => e.to_string(),
            other => other.to_string(),
        };
        Failure::new(code, message)
    }
}

impl From<ServiceError> for Failure {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => e.into(),
            ServiceError::Store(e) => e.into(),
        }
    }
}

impl From<ValidationError> for Failure {
    fn from(err: ValidationError) -> Self {
        Failure::validation(err.to_string())
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for Failure {}

/// Why a menu action stopped.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Reported, then the menu is shown again.
    #[error(transparent)]
    Failure(#[from] Failure),

    /// Input ended (Ctrl-D or end of a piped script).
    #[error("input closed")]
    Closed,

    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ServiceError> for ShellError {
    fn from(err: ServiceError) -> Self {
        ShellError::Failure(err.into())
    }
}

impl From<DbError> for ShellError {
    fn from(err: DbError) -> Self {
        ShellError::Failure(err.into())
    }
}

impl From<ValidationError> for ShellError {
    fn from(err: ValidationError) -> Self {
        ShellError::Failure(err.into())
    }
}

impl From<CoreError> for ShellError {
    fn from(err: CoreError) -> Self {
        ShellError::Failure(err.into())
    }
}

pub type ShellResult<T> = Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_out_of_stock_keeps_date_in_message() {
        let failure: Failure = CoreError::OutOfStock {
            isbn: "111".to_string(),
            next_available: NaiveDate::from_ymd_opt(2024, 4, 2),
        }
        .into();
        assert_eq!(failure.code, ErrorCode::OutOfStock);
        assert!(failure.message.contains("04/02/2024"));
    }

    #[test]
    fn test_store_errors_are_generic() {
        let failure: Failure = DbError::QueryFailed("no such table: borrow".to_string()).into();
        assert_eq!(failure.code, ErrorCode::DatabaseError);
        assert!(!failure.message.contains("borrow"));
    }

    #[test]
    fn test_validation_message_is_unwrapped() {
        let failure: Failure = CoreError::Validation(ValidationError::required("email")).into();
        assert_eq!(failure.code, ErrorCode::ValidationError);
        assert_eq!(failure.message, "email is required");
    }

    #[test]
    fn test_service_error_routes_to_failure() {
        let err: ShellError = ServiceError::Domain(CoreError::AuthenticationFailed).into();
        match err {
            ShellError::Failure(f) => assert_eq!(f.code, ErrorCode::NotAuthenticated),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_policy_overflow_is_reported() {
        let failure: Failure = CoreError::PolicyOutOfRange("due date").into();
        assert_eq!(failure.code, ErrorCode::PolicyOutOfRange);
        assert!(failure.message.contains("due date"));
    }
}
