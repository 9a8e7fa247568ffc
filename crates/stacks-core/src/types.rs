//! # Domain Types
//!
//! Record types shared by the store and the console.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │ InventoryRecord │   │   LoanRecord    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  isbn (key)     │◄──│  isbn (key)     │   │  isbn ┐ (key)   │       │
//! │  │  title          │   │  quantity ≥ 0   │   │  email┘         │       │
//! │  │  subject        │   └─────────────────┘   │  borrow_date    │       │
//! │  │  date_published │                         │  due_date       │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      User       │   │      Role       │                             │
//! │  │  email (key)    │   │  Patron         │                             │
//! │  │  names, dob     │   │  Librarian      │                             │
//! │  │  role           │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The credential hash is not part of [`User`]; it never leaves stacks-db.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::lending::LoanStatus;

// =============================================================================
// Role
// =============================================================================

/// What a registered user may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Searches the catalog and tracks their own loans.
    Patron,
    /// Assigns and receives books, reviews overdue loans.
    Librarian,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Patron => "Patron",
            Role::Librarian => "Librarian",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Patron
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A cataloged title. Immutable once cataloged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub subject: String,
    pub date_published: NaiveDate,
}

/// A person credited on one or more books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Author {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl Author {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The available-copy count for a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryRecord {
    pub isbn: String,
    pub quantity: i64,
}

impl InventoryRecord {
    /// Whether a copy can be lent right now.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.quantity >= 1
    }
}

/// Input for cataloging a new book (seed tool and tests).
///
/// Authors are `(first name, last name)` pairs; existing authors are reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub subject: String,
    pub date_published: NaiveDate,
    pub authors: Vec<(String, String)>,
    pub quantity: i64,
}

// =============================================================================
// Search Results
// =============================================================================

/// One row of a subject search: a book with its co-authors joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SubjectMatch {
    pub title: String,
    pub isbn: String,
    /// Comma-joined "First Last" names, each author once.
    pub authors: String,
}

/// One row of an author search: a book and the matching author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AuthorMatch {
    pub title: String,
    pub subject: String,
    pub date_published: NaiveDate,
    pub author_first: String,
    pub author_last: String,
    pub isbn: String,
}

/// A randomly chosen book from a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Recommendation {
    pub title: String,
    pub authors: String,
    pub isbn: String,
}

/// A catalog line for the librarian's catalog view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CatalogEntry {
    pub isbn: String,
    pub title: String,
    pub subject: String,
    pub date_published: NaiveDate,
    pub authors: String,
    pub quantity: i64,
}

// =============================================================================
// Users
// =============================================================================

/// A registered library user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub role: Role,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Raw signup form, as typed at the console.
///
/// Validated with [`crate::validation::validate_signup`] before any store access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub email: String,
    pub credential: String,
}

/// A signup form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub credential: String,
}

// =============================================================================
// Loans
// =============================================================================

/// One book currently held by one patron.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LoanRecord {
    pub isbn: String,
    pub email: String,
    pub borrow_date: NaiveDate,
    pub due_date: NaiveDate,
}

/// Outcome of a successful return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnReceipt {
    pub loan: LoanRecord,
    pub overdue_days: i64,
    pub charge: crate::money::Money,
}

impl ReturnReceipt {
    pub fn was_late(&self) -> bool {
        self.overdue_days > 0
    }
}

/// A patron's view of one of their loans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowedItem {
    pub title: String,
    pub isbn: String,
    pub due_date: NaiveDate,
    pub status: LoanStatus,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_default_is_patron() {
        assert_eq!(Role::default(), Role::Patron);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Librarian).unwrap(),
            "\"librarian\""
        );
    }

    #[test]
    fn test_inventory_in_stock() {
        let mut record = InventoryRecord {
            isbn: "1".to_string(),
            quantity: 1,
        };
        assert!(record.in_stock());
        record.quantity = 0;
        assert!(!record.in_stock());
    }

    #[test]
    fn test_full_names() {
        let author = Author {
            id: "a".to_string(),
            first_name: "Ursula".to_string(),
            last_name: "Le Guin".to_string(),
        };
        assert_eq!(author.full_name(), "Ursula Le Guin");
    }
}
