//! # Stacks Console
//!
//! Interactive lending console for a small library.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           stacks (binary)                               │
//! │                                                                         │
//! │  cli ──► config::Settings ──► Database ──► AppState                     │
//! │                                               │                         │
//! │  stdin ──► Console ◄── shell::run ◄───────────┘                         │
//! │  stdout ◄──┘              │                                             │
//! │                           ▼                                             │
//! │             commands::{account, catalog, lending}                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! - `STACKS_DATABASE_PATH` - SQLite file (default: platform data directory)
//! - `STACKS_MAX_CONNECTIONS` - pool size (default: 5)
//! - `STACKS_LOAN_PERIOD_DAYS` - loan length (default: 14)
//! - `STACKS_DAILY_CHARGE_CENTS` - overdue charge per day (default: 25)
//! - `RUST_LOG` - log filter, overriding `log_filter`

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod shell;
pub mod state;

// Re-exports
pub use config::{Settings, SettingsError};
pub use console::Console;
pub use error::{ErrorCode, Failure, ShellError, ShellResult};
pub use state::{AppState, Clock};

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Logs go to stderr so they never mix
/// with menu output.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
