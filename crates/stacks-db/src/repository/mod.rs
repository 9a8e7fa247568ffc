//! # Repository Module
//!
//! Database repository implementations for Stacks.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  Console command                                                       │
//! │       │                                                                 │
//! │       │  db.catalog().search_by_author("Herbert")                       │
//! │       ▼                                                                 │
//! │  CatalogRepository   books, authors, written_by, inventory             │
//! │  UserRepository      library_users                                     │
//! │  LoanRepository      borrow (read side)                                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Writes that must keep inventory and the ledger in step go through    │
//! │  LendingService instead (see crate::lending).                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`] - Cataloging, searches, inventory reads
//! - [`UserRepository`] - Registered users and credential hashes
//! - [`LoanRepository`] - Overdue and per-patron loan listings

pub mod catalog;
pub mod loan;
pub mod user;

pub use catalog::CatalogRepository;
pub use loan::LoanRepository;
pub use user::UserRepository;
