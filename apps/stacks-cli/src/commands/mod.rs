//! # Menu Commands
//!
//! One async function per menu entry. Each prompts for what it needs,
//! calls into `stacks-db`, and prints the outcome.
//!
//! ## Command Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  account   sign_up, log_in                        (anonymous)          │
//! │  catalog   search_by_subject, search_by_author,                        │
//! │            recommend                              (patron)             │
//! │            view_catalog, view_patrons             (librarian)          │
//! │  lending   assign_book, return_book, view_overdue (librarian)          │
//! │            my_books                               (patron)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recoverable problems come back as `ShellError::Failure`; the shell prints
//! them and shows the menu again.

pub mod account;
pub mod catalog;
pub mod lending;
