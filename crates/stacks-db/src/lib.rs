//! # stacks-db: Database Layer for Stacks
//!
//! SQLite storage for the catalog, users and the loan ledger, plus the
//! transactional lending and account workflows built on it.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          stacks-db                                      │
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │                         Database                                  │ │
//! │  │  catalog() ──► CatalogRepository   (books, authors, inventory)    │ │
//! │  │  users()   ──► UserRepository      (library_users)                │ │
//! │  │  loans()   ──► LoanRepository      (borrow, read side)            │ │
//! │  │  lending(policy) ──► LendingService (assign / return)             │ │
//! │  │  accounts() ──► AccountService      (signup / login)              │ │
//! │  │  search()   ──► SearchService       (subject / author / pick)     │ │
//! │  └───────────────────────────────────────────────────────────────────┘ │
//! │                               │                                         │
//! │                               ▼                                         │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │                    SQLite (WAL mode)                              │ │
//! │  │  books • authors • written_by • library_users • inventory • borrow│ │
//! │  └───────────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use stacks_db::{Database, DbConfig};
//! use stacks_core::LoanPolicy;
//!
//! let db = Database::new(DbConfig::new("./stacks.db")).await?;
//! let loan = db
//!     .lending(LoanPolicy::default())
//!     .assign_book("ada@example.org", "9780441013593", today)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod accounts;
pub mod credentials;
pub mod error;
pub mod lending;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod search;

// =============================================================================
// Re-exports
// =============================================================================

pub use accounts::AccountService;
pub use error::{DbError, DbResult, ServiceError, ServiceResult};
pub use lending::LendingService;
pub use pool::{Database, DbConfig};
pub use search::SearchService;

pub use repository::catalog::CatalogRepository;
pub use repository::loan::{LoanRepository, TitledLoan};
pub use repository::user::UserRepository;
