//! # Catalog Commands
//!
//! Patron searches and the librarian's catalog and patron listings.
//!
//! ## Subject Selection
//! ```text
//! Select subject:
//! 1: Computing
//! 2: Fantasy
//! 3: Science Fiction
//! Selection: 2        ← 1-based, anything else is "not a valid selection"
//! ```

use stacks_core::dates::format_date;
use stacks_core::validation::validate_selection;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::debug;

use crate::console::{Console, RULE};
use crate::error::{Failure, ShellResult};
use crate::state::AppState;

/// Lists subjects and asks for one. `None` when the catalog is empty.
async fn choose_subject<R, W>(
    state: &AppState,
    console: &mut Console<R, W>,
    title: &str,
) -> ShellResult<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut subjects = state.db().search().subjects().await?;
    if subjects.is_empty() {
        console.say("The catalog is empty.").await?;
        return Ok(None);
    }

    console.say(format!("---------------- {title} ----------------")).await?;
    console.say("Select subject: ").await?;
    for (i, subject) in subjects.iter().enumerate() {
        console.say(format!("{}: {}", i + 1, subject)).await?;
    }

    let input = console.ask("Selection: ").await?;
    let index = validate_selection(&input, subjects.len())
        .map_err(|_| Failure::validation("Sorry, that was not a valid selection."))?;

    Ok(Some(subjects.swap_remove(index)))
}

/// Patron: books in a chosen subject.
pub async fn search_by_subject<R, W>(
    state: &AppState,
    console: &mut Console<R, W>,
) -> ShellResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(subject) = choose_subject(state, console, "Search Menu").await? else {
        return Ok(());
    };

    let books = state.db().search().search_by_subject(&subject).await?;
    debug!(subject = %subject, count = books.len(), "Subject search");

    console.heading("Search Results: ").await?;
    for (i, book) in books.iter().enumerate() {
        console.say(format!("Title: {}", book.title)).await?;
        console.say(format!("Author(s): {}", book.authors)).await?;
        console.say(format!("ISBN: {}", book.isbn)).await?;
        if i + 1 < books.len() {
            console.say(RULE).await?;
        }
    }
    console.blank().await
}

/// Patron: books by an author's last name.
pub async fn search_by_author<R, W>(
    state: &AppState,
    console: &mut Console<R, W>,
) -> ShellResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let last_name = console.ask("Please enter the author's last name: ").await?;

    let books = state.db().search().search_by_author(&last_name).await?;
    if books.is_empty() {
        console.say("Sorry, we do not carry books by that author.").await?;
        return console.blank().await;
    }

    console.heading("Search Results: ").await?;
    for (i, book) in books.iter().enumerate() {
        console.say(format!("Title: {}", book.title)).await?;
        console.say(format!("Subject: {}", book.subject)).await?;
        console
            .say(format!("Date Published: {}", format_date(book.date_published)))
            .await?;
        console
            .say(format!("Author: {} {}", book.author_first, book.author_last))
            .await?;
        console.say(format!("ISBN: {}", book.isbn)).await?;
        if i + 1 < books.len() {
            console.say(RULE).await?;
        }
    }
    console.blank().await
}

/// Patron: one random book from a chosen subject.
pub async fn recommend<R, W>(state: &AppState, console: &mut Console<R, W>) -> ShellResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(subject) = choose_subject(state, console, "Book Recommendation").await? else {
        return Ok(());
    };

    let pick = state.db().search().recommend_book(&subject).await?;

    console.heading("Here is your recommendation: ").await?;
    console.say(format!("Title: {}", pick.title)).await?;
    console.say(format!("Author(s): {}", pick.authors)).await?;
    console.say(format!("ISBN: {}", pick.isbn)).await?;
    console.blank().await
}

/// Librarian: every book with copies on the shelf.
pub async fn view_catalog<R, W>(state: &AppState, console: &mut Console<R, W>) -> ShellResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let entries = state.db().catalog().list_catalog().await?;

    console.heading("Book Catalog: ").await?;
    if entries.is_empty() {
        console.say("The catalog is empty.").await?;
    }
    for entry in &entries {
        console
            .say(format!(
                "{} | {} | {} | {} | {} | available: {}",
                entry.isbn,
                entry.title,
                entry.authors,
                entry.subject,
                format_date(entry.date_published),
                entry.quantity
            ))
            .await?;
    }
    console.blank().await
}

/// Librarian: registered patrons.
pub async fn view_patrons<R, W>(state: &AppState, console: &mut Console<R, W>) -> ShellResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let patrons = state.db().users().list_patrons().await?;

    console.heading("Registered Patrons: ").await?;
    if patrons.is_empty() {
        console.say("No patrons have signed up yet.").await?;
    }
    for patron in &patrons {
        console
            .say(format!("{} <{}>", patron.full_name(), patron.email))
            .await?;
    }
    console.blank().await
}
