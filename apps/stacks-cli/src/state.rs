//! # Application State
//!
//! Everything a menu action needs besides the console and the session.
//! Built once in `main` and borrowed by every command.

use chrono::{Local, NaiveDate};
use stacks_core::LoanPolicy;
use stacks_db::{Database, LendingService};

/// Where "today" comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// The local calendar date.
    #[default]
    System,
    /// A pinned date, for demos and scripted sessions.
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    db: Database,
    policy: LoanPolicy,
    clock: Clock,
}

impl AppState {
    pub fn new(db: Database, policy: LoanPolicy, clock: Clock) -> Self {
        AppState { db, policy, clock }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn lending(&self) -> LendingService {
        self.db.lending(self.policy)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
