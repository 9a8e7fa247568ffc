//! # Seed Tool
//!
//! Populates a Stacks database with a catalog and creates librarian accounts.
//! Console signup only ever creates patrons, so this is where librarians
//! come from.
//!
//! ## Usage
//! ```bash
//! # Built-in demo catalog
//! cargo run -p stacks-db --bin seed -- --db ./stacks.db
//!
//! # Catalog from a JSON file
//! cargo run -p stacks-db --bin seed -- --db ./stacks.db --catalog books.json
//!
//! # Add copies of books already in the catalog
//! cargo run -p stacks-db --bin seed -- --db ./stacks.db --skip-catalog \
//!     --restock 9780441013593:2 --restock 9780547928227:1
//!
//! # Add a librarian
//! cargo run -p stacks-db --bin seed -- --db ./stacks.db --skip-catalog \
//!     --librarian desk@stacks.org --first-name Lee --last-name Brarian \
//!     --dob 01/01/1980 --password change-me
//! ```
//!
//! ## Catalog File
//! ```json
//! [
//!   {
//!     "isbn": "9780441013593",
//!     "title": "Dune",
//!     "subject": "Science Fiction",
//!     "date_published": "1965-08-01",
//!     "authors": [{ "first_name": "Frank", "last_name": "Herbert" }],
//!     "quantity": 3
//!   }
//! ]
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::Parser;
use serde::Deserialize;
use stacks_core::dates::parse_date;
use stacks_core::validation::{validate_email, validate_isbn, validate_name};
use stacks_core::{NewBook, NewUser, Role};
use stacks_db::{Database, DbConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Populate a Stacks database")]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "./stacks.db")]
    db: PathBuf,

    /// JSON catalog file; the built-in demo catalog is used when absent
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Do not load any catalog
    #[arg(long)]
    skip_catalog: bool,

    /// Add copies of a cataloged book, as ISBN:COPIES (repeatable)
    #[arg(long, value_name = "ISBN:COPIES", value_parser = parse_restock)]
    restock: Vec<(String, i64)>,

    /// Email of a librarian account to create
    #[arg(long, requires_all = ["first_name", "last_name", "dob", "password"])]
    librarian: Option<String>,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    /// Date of birth, MM/DD/YYYY
    #[arg(long)]
    dob: Option<String>,

    #[arg(long)]
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedAuthor {
    first_name: String,
    last_name: String,
}

#[derive(Debug, Deserialize)]
struct SeedBook {
    isbn: String,
    title: String,
    subject: String,
    date_published: NaiveDate,
    #[serde(default)]
    authors: Vec<SeedAuthor>,
    quantity: i64,
}

impl From<SeedBook> for NewBook {
    fn from(book: SeedBook) -> Self {
        NewBook {
            isbn: book.isbn,
            title: book.title,
            subject: book.subject,
            date_published: book.date_published,
            authors: book
                .authors
                .into_iter()
                .map(|a| (a.first_name, a.last_name))
                .collect(),
            quantity: book.quantity,
        }
    }
}

/// (isbn, title, subject, published, authors, copies)
type DemoBook = (
    &'static str,
    &'static str,
    &'static str,
    (i32, u32, u32),
    &'static [(&'static str, &'static str)],
    i64,
);

const DEMO_CATALOG: &[DemoBook] = &[
    ("9780441013593", "Dune", "Science Fiction", (1965, 8, 1), &[("Frank", "Herbert")], 3),
    (
        "9780441478125",
        "The Left Hand of Darkness",
        "Science Fiction",
        (1969, 3, 1),
        &[("Ursula", "Le Guin")],
        2,
    ),
    ("9780553293357", "Foundation", "Science Fiction", (1951, 6, 1), &[("Isaac", "Asimov")], 2),
    (
        "9780060853983",
        "Good Omens",
        "Fantasy",
        (1990, 5, 1),
        &[("Terry", "Pratchett"), ("Neil", "Gaiman")],
        2,
    ),
    ("9780062225672", "Mort", "Fantasy", (1987, 11, 12), &[("Terry", "Pratchett")], 1),
    ("9780547928227", "The Hobbit", "Fantasy", (1937, 9, 21), &[("J.R.R.", "Tolkien")], 4),
    (
        "9780131103627",
        "The C Programming Language",
        "Computing",
        (1988, 3, 22),
        &[("Brian", "Kernighan"), ("Dennis", "Ritchie")],
        2,
    ),
    (
        "9780262033848",
        "Introduction to Algorithms",
        "Computing",
        (2009, 7, 31),
        &[
            ("Thomas", "Cormen"),
            ("Charles", "Leiserson"),
            ("Ronald", "Rivest"),
            ("Clifford", "Stein"),
        ],
        1,
    ),
    (
        "9781593278281",
        "The Rust Programming Language",
        "Computing",
        (2018, 8, 1),
        &[("Steve", "Klabnik"), ("Carol", "Nichols")],
        3,
    ),
    ("9780143127796", "The Lowland", "Literary Fiction", (2013, 9, 24), &[("Jhumpa", "Lahiri")], 1),
    (
        "9780140449136",
        "Crime and Punishment",
        "Literary Fiction",
        (1866, 1, 1),
        &[("Fyodor", "Dostoevsky")],
        2,
    ),
    (
        "9780374533557",
        "Thinking, Fast and Slow",
        "Psychology",
        (2011, 10, 25),
        &[("Daniel", "Kahneman")],
        2,
    ),
];

fn demo_catalog() -> anyhow::Result<Vec<NewBook>> {
    DEMO_CATALOG
        .iter()
        .map(|(isbn, title, subject, (y, m, d), authors, quantity)| {
            let date_published = NaiveDate::from_ymd_opt(*y, *m, *d)
                .with_context(|| format!("bad demo date for {isbn}"))?;
            Ok(NewBook {
                isbn: isbn.to_string(),
                title: title.to_string(),
                subject: subject.to_string(),
                date_published,
                authors: authors
                    .iter()
                    .map(|(f, l)| (f.to_string(), l.to_string()))
                    .collect(),
                quantity: *quantity,
            })
        })
        .collect()
}

fn load_catalog(path: &Path) -> anyhow::Result<Vec<NewBook>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog {}", path.display()))?;
    let books: Vec<SeedBook> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    Ok(books.into_iter().map(NewBook::from).collect())
}

fn parse_restock(input: &str) -> Result<(String, i64), String> {
    let (isbn, copies) = input
        .split_once(':')
        .ok_or_else(|| "expected ISBN:COPIES".to_string())?;
    let isbn = validate_isbn(isbn).map_err(|e| e.to_string())?;
    let copies: i64 = copies
        .trim()
        .parse()
        .map_err(|_| format!("'{copies}' is not a number of copies"))?;
    if copies < 1 {
        return Err("copies must be at least 1".to_string());
    }
    Ok((isbn, copies))
}

/// Rejects the whole catalog if any entry is unusable, before anything is written.
fn check_catalog(books: &[NewBook]) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for book in books {
        validate_isbn(&book.isbn)?;
        if book.title.trim().is_empty() || book.subject.trim().is_empty() {
            bail!("{} needs a title and a subject", book.isbn);
        }
        if book.quantity < 0 {
            bail!("{} has a negative quantity", book.isbn);
        }
        if !seen.insert(book.isbn.as_str()) {
            bail!("{} appears more than once", book.isbn);
        }
    }
    Ok(())
}

async fn seed_catalog(db: &Database, books: Vec<NewBook>) -> anyhow::Result<()> {
    check_catalog(&books)?;

    let existing = db.catalog().count_books().await?;
    if existing > 0 {
        warn!(existing, "Catalog already populated; skipping");
        println!("Database already has {existing} books, skipping catalog.");
        return Ok(());
    }

    let mut added = 0;
    for book in &books {
        if let Err(e) = db.catalog().insert_book(book).await {
            eprintln!("Failed to catalog {}: {}", book.isbn, e);
            continue;
        }
        added += 1;
    }

    info!(added, "Catalog seeded");
    println!("Cataloged {added} of {} books.", books.len());
    Ok(())
}

async fn restock_books(db: &Database, restocks: &[(String, i64)]) -> anyhow::Result<()> {
    let catalog = db.catalog();
    for (isbn, _) in restocks {
        if !catalog.book_exists(isbn).await? {
            bail!("cannot restock {isbn}: not in the catalog");
        }
    }

    for (isbn, copies) in restocks {
        catalog.restock(isbn, *copies).await?;
        let now = catalog.inventory(isbn).await?.quantity;
        println!("Restocked {isbn} with {copies}; {now} on the shelf.");
    }
    Ok(())
}

async fn seed_librarian(db: &Database, args: &Args, email: &str) -> anyhow::Result<()> {
    let user = NewUser {
        email: validate_email(email)?,
        first_name: validate_name("first name", args.first_name.as_deref().unwrap_or_default())?,
        last_name: validate_name("last name", args.last_name.as_deref().unwrap_or_default())?,
        dob: parse_date("date of birth", args.dob.as_deref().unwrap_or_default())?,
        credential: args.password.clone().unwrap_or_default(),
    };
    if user.credential.is_empty() {
        bail!("--password is required for a librarian");
    }

    let created = db.accounts().register(&user, Role::Librarian).await?;
    println!("Created librarian {}.", created.email);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    println!("Stacks seed tool");
    println!("Database: {}", args.db.display());

    let db = Database::new(DbConfig::new(&args.db))
        .await
        .context("opening database")?;

    if !args.skip_catalog {
        let books = match &args.catalog {
            Some(path) => load_catalog(path)?,
            None => demo_catalog()?,
        };
        seed_catalog(&db, books).await?;
    }

    restock_books(&db, &args.restock).await?;

    if let Some(email) = &args.librarian {
        seed_librarian(&db, &args, email).await?;
    }

    db.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(isbn: &str, quantity: i64) -> NewBook {
        NewBook {
            isbn: isbn.to_string(),
            title: format!("Title {isbn}"),
            subject: "Fantasy".to_string(),
            date_published: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
            authors: vec![("Terry".to_string(), "Pratchett".to_string())],
            quantity,
        }
    }

    #[test]
    fn test_parse_restock() {
        assert_eq!(parse_restock("111:3"), Ok(("111".to_string(), 3)));
        assert!(parse_restock("111").is_err());
        assert!(parse_restock("111:0").is_err());
        assert!(parse_restock("111:many").is_err());
        assert!(parse_restock(":2").is_err());
    }

    #[test]
    fn test_demo_catalog_is_valid() {
        let books = demo_catalog().unwrap();
        assert_eq!(books.len(), DEMO_CATALOG.len());
        check_catalog(&books).unwrap();
    }

    #[tokio::test]
    async fn test_bad_entry_leaves_catalog_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let books = vec![book("111", 2), book("222", -1), book("333", 1)];

        assert!(seed_catalog(&db, books).await.is_err());
        assert_eq!(db.catalog().count_books().await.unwrap(), 0);

        let dupes = vec![book("111", 2), book("111", 1)];
        assert!(seed_catalog(&db, dupes).await.is_err());
        assert_eq!(db.catalog().count_books().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_restock_adds_copies_to_known_books_only() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_catalog(&db, vec![book("111", 2)]).await.unwrap();

        restock_books(&db, &[("111".to_string(), 3)]).await.unwrap();
        assert_eq!(db.catalog().inventory("111").await.unwrap().quantity, 5);

        let err = restock_books(&db, &[("111".to_string(), 1), ("999".to_string(), 1)]).await;
        assert!(err.is_err());
        assert_eq!(db.catalog().inventory("111").await.unwrap().quantity, 5);
    }
}
