//! # stacks-core: Pure Lending Logic for Stacks
//!
//! This crate holds the domain rules of the library lending system as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stacks Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Console (apps/stacks-cli)                      │   │
//! │  │   Anonymous menu ──► Patron menu / Librarian menu               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ stacks-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  lending  │  │   money   │  │ validation│  │   │
//! │  │   │   Book    │  │ LoanPolicy│  │   Money   │  │  signup   │  │   │
//! │  │   │ LoanRecord│  │ LoanStatus│  │           │  │   rules   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CONSOLE • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stacks-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, lending transactions         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Book, LoanRecord, User, ...)
//! - [`lending`] - Due dates, overdue days and charges
//! - [`money`] - Integer-cent money type for overdue charges
//! - [`dates`] - The `MM/DD/YYYY` boundary format
//! - [`session`] - Explicit session context for the console
//! - [`validation`] - Signup and lookup input rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use stacks_core::lending::LoanPolicy;
//!
//! let policy = LoanPolicy::default();
//! let borrowed = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let due = policy.due_date(borrowed).unwrap();
//!
//! // One day late costs one day of charge
//! let late = due.succ_opt().unwrap();
//! assert_eq!(policy.overdue_days(due, late), 1);
//! assert_eq!(policy.charge_for(1).unwrap().cents(), 25);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dates;
pub mod error;
pub mod lending;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use lending::{LoanPolicy, LoanStatus};
pub use money::Money;
pub use session::Session;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Days a patron may keep a book before it becomes overdue.
pub const DEFAULT_LOAN_PERIOD_DAYS: i64 = 14;

/// Overdue charge per late day, in cents ($0.25).
pub const DEFAULT_DAILY_CHARGE_CENTS: i64 = 25;

/// Longest loan period the console accepts from settings (ten years).
pub const MAX_LOAN_PERIOD_DAYS: i64 = 3_650;

/// Highest daily charge the console accepts from settings ($1,000.00).
pub const MAX_DAILY_CHARGE_CENTS: i64 = 100_000;
