//! # Catalog Repository
//!
//! Books, their authors, and available-copy counts.
//!
//! ## Key Operations
//! - Cataloging (seed tool): book + authors + inventory in one transaction
//! - Subject and author searches
//! - Random recommendation within a subject
//!
//! ## Co-author Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  books ⋈ written_by ⋈ authors, GROUP BY isbn                          │
//! │                                                                         │
//! │  isbn  │ title        │ first  │ last                                  │
//! │  ───── │ ──────────── │ ────── │ ──────                                │
//! │  111   │ Good Omens   │ Terry  │ Pratchett   ┐                         │
//! │  111   │ Good Omens   │ Neil   │ Gaiman      ┘─► "Neil Gaiman, Terry..."│
//! │  222   │ Mort         │ Terry  │ Pratchett   ──► "Terry Pratchett"      │
//! │                                                                         │
//! │  One row per book; each author named once.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use stacks_core::{
    AuthorMatch, Book, CatalogEntry, InventoryRecord, NewBook, Recommendation, SubjectMatch,
};

/// Authors of one book, joined into a single string.
///
/// `written_by` has a (isbn, author_id) primary key, so a grouped row never
/// repeats an author. Names are sorted inside the subquery so output is stable.
const AUTHORS_OF_BOOK: &str = r#"
    COALESCE((
        SELECT GROUP_CONCAT(name, ', ') FROM (
            SELECT a.first_name || ' ' || a.last_name AS name
            FROM written_by w
            INNER JOIN authors a ON a.id = w.author_id
            WHERE w.isbn = b.isbn
            ORDER BY a.last_name, a.first_name
        )
    ), '')
"#;

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CatalogRepository::new(pool);
///
/// let subjects = repo.list_subjects().await?;
/// let books = repo.search_by_subject(&subjects[0]).await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Cataloging
    // =========================================================================

    /// Catalogs a new book with its authors and initial copy count.
    ///
    /// Existing authors (same first and last name) are reused. Everything is
    /// written in one transaction, so a duplicate ISBN leaves no partial rows.
    pub async fn insert_book(&self, book: &NewBook) -> DbResult<()> {
        debug!(isbn = %book.isbn, title = %book.title, "Cataloging book");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO books (isbn, title, subject, date_published)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.title)
        .bind(&book.subject)
        .bind(book.date_published)
        .execute(&mut *tx)
        .await?;

        for (first_name, last_name) in &book.authors {
            let existing: Option<String> = sqlx::query_scalar(
                "SELECT id FROM authors WHERE first_name = ?1 AND last_name = ?2",
            )
            .bind(first_name)
            .bind(last_name)
            .fetch_optional(&mut *tx)
            .await?;

            let author_id = match existing {
                Some(id) => id,
                None => {
                    let id = Uuid::new_v4().to_string();
                    sqlx::query(
                        "INSERT INTO authors (id, first_name, last_name) VALUES (?1, ?2, ?3)",
                    )
                    .bind(&id)
                    .bind(first_name)
                    .bind(last_name)
                    .execute(&mut *tx)
                    .await?;
                    id
                }
            };

            sqlx::query("INSERT OR IGNORE INTO written_by (isbn, author_id) VALUES (?1, ?2)")
                .bind(&book.isbn)
                .bind(&author_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("INSERT INTO inventory (isbn, quantity) VALUES (?1, ?2)")
            .bind(&book.isbn)
            .bind(book.quantity)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(isbn = %book.isbn, copies = book.quantity, "Book cataloged");
        Ok(())
    }

    /// Adds copies to an existing inventory record (restocking).
    pub async fn restock(&self, isbn: &str, copies: i64) -> DbResult<()> {
        debug!(isbn = %isbn, copies = copies, "Restocking");

        sqlx::query(
            r#"
            INSERT INTO inventory (isbn, quantity) VALUES (?1, ?2)
            ON CONFLICT(isbn) DO UPDATE SET quantity = quantity + excluded.quantity
            "#,
        )
        .bind(isbn)
        .bind(copies)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Gets a book by ISBN.
    pub async fn get_book(&self, isbn: &str) -> DbResult<Option<Book>> {
        debug!(isbn = %isbn, "Getting book");

        let book = sqlx::query_as::<_, Book>(
            "SELECT isbn, title, subject, date_published FROM books WHERE isbn = ?1",
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Whether a book with this ISBN is cataloged.
    pub async fn book_exists(&self, isbn: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM books WHERE isbn = ?1")
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Gets the inventory record for a book.
    ///
    /// A cataloged book with no inventory row has zero copies.
    pub async fn inventory(&self, isbn: &str) -> DbResult<InventoryRecord> {
        let quantity: Option<i64> =
            sqlx::query_scalar("SELECT quantity FROM inventory WHERE isbn = ?1")
                .bind(isbn)
                .fetch_optional(&self.pool)
                .await?;

        Ok(InventoryRecord {
            isbn: isbn.to_string(),
            quantity: quantity.unwrap_or(0),
        })
    }

    /// Counts cataloged books.
    pub async fn count_books(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // Searches
    // =========================================================================

    /// Distinct subjects, alphabetical.
    pub async fn list_subjects(&self) -> DbResult<Vec<String>> {
        let subjects: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT subject FROM books ORDER BY subject")
                .fetch_all(&self.pool)
                .await?;

        debug!(count = subjects.len(), "Listed subjects");
        Ok(subjects)
    }

    /// Books in a subject, one row per book with co-authors joined.
    pub async fn search_by_subject(&self, subject: &str) -> DbResult<Vec<SubjectMatch>> {
        debug!(subject = %subject, "Searching by subject");

        let sql = format!(
            r#"
            SELECT b.title, b.isbn, {AUTHORS_OF_BOOK} AS authors
            FROM books b
            WHERE b.subject = ?1
            ORDER BY b.title, b.isbn
            "#
        );

        let matches = sqlx::query_as::<_, SubjectMatch>(&sql)
            .bind(subject)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = matches.len(), "Subject search returned books");
        Ok(matches)
    }

    /// Books by authors with this last name (case-insensitive).
    ///
    /// Ordered by author first name, then last name, then title. No match is
    /// an empty vector, not an error.
    pub async fn search_by_author(&self, last_name: &str) -> DbResult<Vec<AuthorMatch>> {
        debug!(last_name = %last_name, "Searching by author");

        let matches = sqlx::query_as::<_, AuthorMatch>(
            r#"
            SELECT
                b.title,
                b.subject,
                b.date_published,
                a.first_name AS author_first,
                a.last_name AS author_last,
                b.isbn
            FROM authors a
            INNER JOIN written_by w ON w.author_id = a.id
            INNER JOIN books b ON b.isbn = w.isbn
            WHERE a.last_name = ?1 COLLATE NOCASE
            ORDER BY a.first_name, a.last_name, b.title
            "#,
        )
        .bind(last_name.trim())
        .fetch_all(&self.pool)
        .await?;

        debug!(count = matches.len(), "Author search returned books");
        Ok(matches)
    }

    /// Picks one book in the subject uniformly at random.
    ///
    /// Returns `None` when the subject has no books.
    pub async fn recommend(&self, subject: &str) -> DbResult<Option<Recommendation>> {
        debug!(subject = %subject, "Picking recommendation");

        let sql = format!(
            r#"
            SELECT b.title, {AUTHORS_OF_BOOK} AS authors, b.isbn
            FROM books b
            WHERE b.subject = ?1
            ORDER BY RANDOM()
            LIMIT 1
            "#
        );

        let pick = sqlx::query_as::<_, Recommendation>(&sql)
            .bind(subject)
            .fetch_optional(&self.pool)
            .await?;

        Ok(pick)
    }

    /// The whole catalog with authors and available copies, by title.
    pub async fn list_catalog(&self) -> DbResult<Vec<CatalogEntry>> {
        let sql = format!(
            r#"
            SELECT
                b.isbn,
                b.title,
                b.subject,
                b.date_published,
                {AUTHORS_OF_BOOK} AS authors,
                COALESCE(i.quantity, 0) AS quantity
            FROM books b
            LEFT JOIN inventory i ON i.isbn = b.isbn
            ORDER BY b.title, b.isbn
            "#
        );

        let entries = sqlx::query_as::<_, CatalogEntry>(&sql)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = entries.len(), "Listed catalog");
        Ok(entries)
    }
}
