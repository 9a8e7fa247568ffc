//! # Loan Repository
//!
//! Read side of the `borrow` ledger. Rows are created and removed only by
//! [`crate::lending::LendingService`], which keeps them in step with
//! inventory.

use chrono::NaiveDate;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stacks_core::LoanRecord;

/// A loan joined with its book title, for the patron's own listing.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TitledLoan {
    pub title: String,
    pub isbn: String,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct LoanRepository {
    pool: SqlitePool,
}

impl LoanRepository {
    /// Creates a new LoanRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LoanRepository { pool }
    }

    /// Gets the outstanding loan of `isbn` to `email`, if any.
    pub async fn get(&self, isbn: &str, email: &str) -> DbResult<Option<LoanRecord>> {
        let loan = sqlx::query_as::<_, LoanRecord>(
            r#"
            SELECT isbn, email, borrow_date, due_date
            FROM borrow
            WHERE isbn = ?1 AND email = ?2
            "#,
        )
        .bind(isbn)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }

    /// Earliest due date among outstanding loans of a book.
    ///
    /// This is when the next copy is expected back.
    pub async fn earliest_due_date(&self, isbn: &str) -> DbResult<Option<NaiveDate>> {
        let due: Option<NaiveDate> = sqlx::query_scalar(
            "SELECT due_date FROM borrow WHERE isbn = ?1 ORDER BY due_date LIMIT 1",
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(due)
    }

    /// Number of outstanding loans of a book.
    pub async fn count_for_book(&self, isbn: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM borrow WHERE isbn = ?1")
            .bind(isbn)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Loans due strictly before `today`, streamed from the database.
    ///
    /// Ordered by due date, then isbn, then email. The stream holds a pool
    /// connection until it is dropped or exhausted.
    pub fn overdue(&self, today: NaiveDate) -> BoxStream<'_, DbResult<LoanRecord>> {
        debug!(today = %today, "Streaming overdue loans");

        sqlx::query_as::<_, LoanRecord>(
            r#"
            SELECT isbn, email, borrow_date, due_date
            FROM borrow
            WHERE due_date < ?1
            ORDER BY due_date, isbn, email
            "#,
        )
        .bind(today)
        .fetch(&self.pool)
        .map_err(DbError::from)
        .boxed()
    }

    /// A patron's loans with book titles, by due date.
    pub async fn borrowed_by(&self, email: &str) -> DbResult<Vec<TitledLoan>> {
        debug!(email = %email, "Listing patron loans");

        let loans = sqlx::query_as::<_, TitledLoan>(
            r#"
            SELECT b.title, l.isbn, l.due_date
            FROM borrow l
            INNER JOIN books b ON b.isbn = l.isbn
            WHERE l.email = ?1
            ORDER BY l.due_date, b.title
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }
}
