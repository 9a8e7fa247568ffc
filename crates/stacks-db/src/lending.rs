//! # Lending Workflow
//!
//! Assigning and returning books. These are the only writes that touch both
//! `inventory` and `borrow`, and each runs as one SQLite transaction.
//!
//! ## Assign
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  assign_book(email, isbn, today)                                       │
//! │       │                                                                 │
//! │       ├── book cataloged?        no → BookNotFound                     │
//! │       ├── patron registered?     no → PatronNotFound                   │
//! │       ├── already holds a copy?  yes → AlreadyBorrowed                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                 │
//! │    UPDATE inventory SET quantity = quantity - 1                        │
//! │     WHERE isbn = ? AND quantity >= 1      ← guarded write, first stmt  │
//! │       │                                                                 │
//! │       ├── 0 rows → ROLLBACK → OutOfStock { next_available }            │
//! │       ▼                                                                 │
//! │    INSERT INTO borrow (...)                                            │
//! │  COMMIT                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! The guarded write is the first statement of the transaction, so it takes
//! SQLite's write lock before anything is read. A second terminal's
//! transaction waits on the busy timeout, then sees the decremented count and
//! updates zero rows. Two concurrent assigns of the last copy produce exactly
//! one loan.
//!
//! ## Return
//! ```text
//! BEGIN
//!   DELETE FROM borrow WHERE isbn = ? AND email = ? RETURNING ...
//!     │
//!     ├── no row → ROLLBACK → LoanNotFound
//!     ▼
//!   LoanPolicy::settle → ReturnReceipt { overdue_days, charge }
//!     │
//!     ├── charge overflows → ROLLBACK → PolicyOutOfRange
//!     ▼
//!   UPDATE inventory SET quantity = quantity + 1
//! COMMIT
//! ```

use chrono::NaiveDate;
use futures::stream::BoxStream;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult, ServiceResult};
use crate::repository::{CatalogRepository, LoanRepository, UserRepository};
use stacks_core::{BorrowedItem, CoreError, CoreResult, LoanPolicy, LoanRecord, ReturnReceipt};

/// The lending workflow bound to one loan policy.
///
/// ## Usage
/// ```rust,ignore
/// let lending = db.lending(LoanPolicy::default());
///
/// let loan = lending.assign_book("ada@example.org", "9780441013593", today).await?;
/// let receipt = lending.return_book("ada@example.org", "9780441013593", later).await?;
/// println!("charge: {}", receipt.charge);
/// ```
#[derive(Debug, Clone)]
pub struct LendingService {
    pool: SqlitePool,
    policy: LoanPolicy,
    catalog: CatalogRepository,
    users: UserRepository,
    loans: LoanRepository,
}

impl LendingService {
    pub fn new(pool: SqlitePool, policy: LoanPolicy) -> Self {
        LendingService {
            catalog: CatalogRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            loans: LoanRepository::new(pool.clone()),
            pool,
            policy,
        }
    }

    async fn require_book_and_patron(&self, isbn: &str, email: &str) -> ServiceResult<()> {
        if !self.catalog.book_exists(isbn).await? {
            return Err(CoreError::BookNotFound(isbn.to_string()).into());
        }
        if !self.users.exists(email).await? {
            return Err(CoreError::PatronNotFound(email.to_string()).into());
        }
        Ok(())
    }

    // =========================================================================
    // Assign
    // =========================================================================

    /// Lends one copy of `isbn` to `email`, due `loan_period_days` from today.
    ///
    /// ## Errors
    /// - `BookNotFound`, `PatronNotFound` before anything is written
    /// - `AlreadyBorrowed` if the patron already holds a copy
    /// - `OutOfStock` with the earliest due date of the outstanding copies
    /// - `PolicyOutOfRange` if the due date cannot be represented
    pub async fn assign_book(
        &self,
        email: &str,
        isbn: &str,
        today: NaiveDate,
    ) -> ServiceResult<LoanRecord> {
        debug!(email = %email, isbn = %isbn, today = %today, "Assigning book");

        self.require_book_and_patron(isbn, email).await?;

        if self.loans.get(isbn, email).await?.is_some() {
            warn!(email = %email, isbn = %isbn, "Patron already holds this book");
            return Err(already_borrowed(isbn, email));
        }

        let loan = self.policy.open_loan(isbn, email, today)?;

        let mut tx = self.pool.begin().await?;

        let taken = sqlx::query(
            "UPDATE inventory SET quantity = quantity - 1 WHERE isbn = ?1 AND quantity >= 1",
        )
        .bind(isbn)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if taken == 0 {
            tx.rollback().await?;

            let next_available = self.loans.earliest_due_date(isbn).await?;
            warn!(isbn = %isbn, next_available = ?next_available, "Book out of stock");

            return Err(CoreError::OutOfStock {
                isbn: isbn.to_string(),
                next_available,
            }
            .into());
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO borrow (isbn, email, borrow_date, due_date)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&loan.isbn)
        .bind(&loan.email)
        .bind(loan.borrow_date)
        .bind(loan.due_date)
        .execute(&mut *tx)
        .await;

        if let Err(err) = inserted {
            tx.rollback().await?;
            let err = DbError::from(err);
            if err.is_unique_violation() {
                warn!(email = %email, isbn = %isbn, "Concurrent duplicate loan rejected");
                return Err(already_borrowed(isbn, email));
            }
            return Err(err.into());
        }

        tx.commit().await?;

        info!(
            email = %email,
            isbn = %isbn,
            due_date = %loan.due_date,
            "Book assigned"
        );
        Ok(loan)
    }

    // =========================================================================
    // Return
    // =========================================================================

    /// Takes a copy back, closes the loan and computes the late charge.
    ///
    /// ## Errors
    /// - `BookNotFound` (checked first), then `PatronNotFound`
    /// - `LoanNotFound` if this patron holds no copy of this book
    /// - `PolicyOutOfRange` if the charge overflows; the loan stays open
    pub async fn return_book(
        &self,
        email: &str,
        isbn: &str,
        today: NaiveDate,
    ) -> ServiceResult<ReturnReceipt> {
        debug!(email = %email, isbn = %isbn, today = %today, "Returning book");

        self.require_book_and_patron(isbn, email).await?;

        let mut tx = self.pool.begin().await?;

        let closed = sqlx::query_as::<_, LoanRecord>(
            r#"
            DELETE FROM borrow
            WHERE isbn = ?1 AND email = ?2
            RETURNING isbn, email, borrow_date, due_date
            "#,
        )
        .bind(isbn)
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(loan) = closed else {
            tx.rollback().await?;
            warn!(email = %email, isbn = %isbn, "No matching loan to return");
            return Err(CoreError::LoanNotFound {
                isbn: isbn.to_string(),
                email: email.to_string(),
            }
            .into());
        };

        let receipt = match self.policy.settle(loan, today) {
            Ok(receipt) => receipt,
            Err(err) => {
                tx.rollback().await?;
                warn!(email = %email, isbn = %isbn, error = %err, "Charge not computable");
                return Err(err.into());
            }
        };

        sqlx::query(
            r#"
            INSERT INTO inventory (isbn, quantity) VALUES (?1, 1)
            ON CONFLICT(isbn) DO UPDATE SET quantity = quantity + 1
            "#,
        )
        .bind(isbn)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            email = %email,
            isbn = %isbn,
            overdue_days = receipt.overdue_days,
            charge = %receipt.charge,
            "Book returned"
        );
        Ok(receipt)
    }

    // =========================================================================
    // Listings
    // =========================================================================

    /// Loans due before `today`, streamed lazily by due date.
    pub fn list_overdue(&self, today: NaiveDate) -> BoxStream<'_, DbResult<LoanRecord>> {
        self.loans.overdue(today)
    }

    /// A patron's loans with where each stands relative to today.
    pub async fn list_borrowed_by_patron(
        &self,
        email: &str,
        today: NaiveDate,
    ) -> ServiceResult<Vec<BorrowedItem>> {
        let items = self
            .loans
            .borrowed_by(email)
            .await?
            .into_iter()
            .map(|loan| {
                Ok(BorrowedItem {
                    status: self.policy.status(loan.due_date, today)?,
                    title: loan.title,
                    isbn: loan.isbn,
                    due_date: loan.due_date,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(items)
    }
}

fn already_borrowed(isbn: &str, email: &str) -> crate::error::ServiceError {
    CoreError::AlreadyBorrowed {
        isbn: isbn.to_string(),
        email: email.to_string(),
    }
    .into()
}
