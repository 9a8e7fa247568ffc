//! # Validation Module
//!
//! Input validation for console forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Console                                                      │
//! │  └── Trims input, re-prompts on bad menu selections                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, email shape, MM/DD/YYYY dates                    │
//! │  └── Length limits                                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── PRIMARY KEY on email (duplicate signups)                          │
//! │  └── CHECK (quantity >= 0)                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries are always bound parameters, so no quote stripping happens here.

use crate::dates::parse_date;
use crate::error::ValidationError;
use crate::types::{NewUser, SignupForm};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Email domains the library accepts.
const ACCEPTED_EMAIL_SUFFIXES: &[&str] = &["com", "org", "edu"];

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a person's name field.
pub fn validate_name(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(value.to_string())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Must contain `@` with text on both sides
/// - Must end in `com`, `org` or `edu`
///
/// ## Example
/// ```rust
/// use stacks_core::validation::validate_email;
///
/// assert!(validate_email("ada@example.org").is_ok());
/// assert!(validate_email("ada.example.org").is_err());
/// assert!(validate_email("ada@example.io").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    };
    if !well_formed {
        return Err(ValidationError::invalid_format("email", "must contain '@'"));
    }

    if !ACCEPTED_EMAIL_SUFFIXES
        .iter()
        .any(|suffix| email.to_ascii_lowercase().ends_with(suffix))
    {
        return Err(ValidationError::invalid_format(
            "email",
            "must end in com, org or edu",
        ));
    }

    Ok(email.to_string())
}

/// Validates an ISBN as typed by a librarian.
///
/// Only emptiness and length are checked; catalog lookups decide existence.
pub fn validate_isbn(isbn: &str) -> ValidationResult<String> {
    let isbn = isbn.trim();

    if isbn.is_empty() {
        return Err(ValidationError::required("isbn"));
    }

    if isbn.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "isbn".to_string(),
            max: 20,
        });
    }

    Ok(isbn.to_string())
}

/// Validates a free-text search term (author last name).
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.is_empty() {
        return Err(ValidationError::required("search term"));
    }

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "search term".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates a signup form.
///
/// ## User Workflow
/// ```text
/// Sign up
///   first name / last name / dob / email / password
///        │
///        ▼
///   validate_signup ← THIS FUNCTION
///        │
///        ├── empty field?       → "<field> is required"
///        ├── bad email?         → "email has invalid format: ..."
///        ├── dob not MM/DD/YYYY → "dob has invalid format: ..."
///        │
///        └── OK → NewUser (duplicate email is checked by the store)
/// ```
pub fn validate_signup(form: &SignupForm) -> ValidationResult<NewUser> {
    let first_name = validate_name("first name", &form.first_name)?;
    let last_name = validate_name("last name", &form.last_name)?;
    let dob = parse_date("date of birth", &form.dob)?;
    let email = validate_email(&form.email)?;

    if form.credential.is_empty() {
        return Err(ValidationError::required("password"));
    }

    Ok(NewUser {
        email,
        first_name,
        last_name,
        dob,
        credential: form.credential.clone(),
    })
}

/// Parses a 1-based menu selection into an index into `len` options.
pub fn validate_selection(input: &str, len: usize) -> ValidationResult<usize> {
    let choice: usize = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::invalid_format("selection", "not a number"))?;

    if choice == 0 || choice > len {
        return Err(ValidationError::OutOfRange {
            field: "selection".to_string(),
            min: 1,
            max: len as i64,
        });
    }

    Ok(choice - 1)
}

// =============================================================================
// Unit Tests
// =============================================================================
