//! # Lending Rules
//!
//! Date arithmetic and charges for loans. The store applies these inside its
//! transactions; nothing here touches the database.
//!
//! ## Loan Timeline
//! ```text
//! borrow_date                     due_date
//!     │◄──── loan_period_days ─────►│
//!     ●─────────────────────────────●──────────┬──────────┬────►
//!                                   │ DueToday │ day 1    │ day 2
//!                                   │ $0.00    │ $0.25    │ $0.50
//! ```

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{LoanRecord, ReturnReceipt};
use crate::{DEFAULT_DAILY_CHARGE_CENTS, DEFAULT_LOAN_PERIOD_DAYS};

/// How long loans last and what lateness costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPolicy {
    pub loan_period_days: i64,
    pub daily_charge: Money,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        LoanPolicy {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
            daily_charge: Money::from_cents(DEFAULT_DAILY_CHARGE_CENTS),
        }
    }
}

impl LoanPolicy {
    pub fn new(loan_period_days: i64, daily_charge: Money) -> Self {
        LoanPolicy {
            loan_period_days,
            daily_charge,
        }
    }

    /// Date a loan opened on `borrowed` must come back.
    ///
    /// Fails with `PolicyOutOfRange` when the period is negative or runs
    /// past the last representable date.
    pub fn due_date(&self, borrowed: NaiveDate) -> CoreResult<NaiveDate> {
        u64::try_from(self.loan_period_days)
            .ok()
            .and_then(|days| borrowed.checked_add_days(Days::new(days)))
            .ok_or(CoreError::PolicyOutOfRange("due date"))
    }

    /// Builds the ledger entry for a loan opened today.
    pub fn open_loan(&self, isbn: &str, email: &str, today: NaiveDate) -> CoreResult<LoanRecord> {
        Ok(LoanRecord {
            isbn: isbn.to_string(),
            email: email.to_string(),
            borrow_date: today,
            due_date: self.due_date(today)?,
        })
    }

    /// Whole days past due; zero on or before the due date.
    pub fn overdue_days(&self, due: NaiveDate, today: NaiveDate) -> i64 {
        (today - due).num_days().max(0)
    }

    /// Charge for a number of late days.
    pub fn charge_for(&self, overdue_days: i64) -> CoreResult<Money> {
        self.daily_charge
            .checked_times_days(overdue_days.max(0))
            .ok_or(CoreError::PolicyOutOfRange("overdue charge"))
    }

    /// Settles a loan being returned today.
    pub fn settle(&self, loan: LoanRecord, today: NaiveDate) -> CoreResult<ReturnReceipt> {
        let overdue_days = self.overdue_days(loan.due_date, today);
        Ok(ReturnReceipt {
            charge: self.charge_for(overdue_days)?,
            overdue_days,
            loan,
        })
    }

    /// Where a loan stands relative to today.
    pub fn status(&self, due: NaiveDate, today: NaiveDate) -> CoreResult<LoanStatus> {
        let days_until_due = (due - today).num_days();
        let status = match days_until_due {
            d if d < 0 => LoanStatus::Overdue {
                days: -d,
                charge: self.charge_for(-d)?,
            },
            0 => LoanStatus::DueToday,
            d => LoanStatus::Upcoming { days_remaining: d },
        };
        Ok(status)
    }
}

/// A patron-facing loan state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoanStatus {
    /// Past due; `charge` is the running total so far.
    Overdue { days: i64, charge: Money },
    /// Due back by the end of today.
    DueToday,
    Upcoming { days_remaining: i64 },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_due_date_is_fourteen_days_out() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.due_date(date(2024, 1, 25)).unwrap(), date(2024, 2, 8));
    }

    #[test]
    fn test_open_loan() {
        let loan = LoanPolicy::default()
            .open_loan("isbn", "a@b.com", date(2024, 3, 1))
            .unwrap();
        assert_eq!(loan.borrow_date, date(2024, 3, 1));
        assert_eq!(loan.due_date, date(2024, 3, 15));
    }

    #[test]
    fn test_same_day_return_is_free() {
        let policy = LoanPolicy::default();
        let today = date(2024, 3, 1);
        let receipt = policy
            .settle(policy.open_loan("i", "e", today).unwrap(), today)
            .unwrap();
        assert_eq!(receipt.overdue_days, 0);
        assert!(receipt.charge.is_zero());
        assert!(!receipt.was_late());
    }

    #[test]
    fn test_one_day_late_costs_one_day() {
        let policy = LoanPolicy::default();
        let loan = policy.open_loan("i", "e", date(2024, 3, 1)).unwrap();
        let receipt = policy.settle(loan, date(2024, 3, 16)).unwrap();
        assert_eq!(receipt.overdue_days, 1);
        assert_eq!(receipt.charge, Money::from_cents(25));
    }

    #[test]
    fn test_configured_rate() {
        let policy = LoanPolicy::new(7, Money::from_cents(10));
        assert_eq!(policy.due_date(date(2024, 1, 1)).unwrap(), date(2024, 1, 8));
        assert_eq!(policy.charge_for(3).unwrap(), Money::from_cents(30));
        assert_eq!(policy.charge_for(-3).unwrap(), Money::zero());
    }

    #[test]
    fn test_status_boundaries() {
        let policy = LoanPolicy::default();
        let due = date(2024, 5, 10);

        assert_eq!(
            policy.status(due, date(2024, 5, 7)).unwrap(),
            LoanStatus::Upcoming { days_remaining: 3 }
        );
        assert_eq!(policy.status(due, due).unwrap(), LoanStatus::DueToday);
        assert_eq!(
            policy.status(due, date(2024, 5, 12)).unwrap(),
            LoanStatus::Overdue {
                days: 2,
                charge: Money::from_cents(50)
            }
        );
    }

    #[test]
    fn test_huge_loan_period_is_an_error() {
        let policy = LoanPolicy::new(100_000_000, Money::from_cents(25));
        assert!(matches!(
            policy.open_loan("111", "a@x.com", date(2024, 3, 1)),
            Err(CoreError::PolicyOutOfRange("due date"))
        ));
        assert!(LoanPolicy::new(-1, Money::zero()).due_date(date(2024, 3, 1)).is_err());
    }

    #[test]
    fn test_huge_daily_charge_is_an_error() {
        let policy = LoanPolicy::new(14, Money::from_cents(i64::MAX / 2));
        assert!(matches!(
            policy.charge_for(3),
            Err(CoreError::PolicyOutOfRange("overdue charge"))
        ));
        assert!(policy.status(date(2024, 3, 1), date(2024, 3, 4)).is_err());
        assert_eq!(policy.charge_for(0).unwrap(), Money::zero());
    }
}
