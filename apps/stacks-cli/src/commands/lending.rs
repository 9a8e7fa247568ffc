//! # Lending Commands
//!
//! Librarian desk actions and the patron's own loan list.

use futures::TryStreamExt;
use stacks_core::dates::format_date;
use stacks_core::validation::{validate_email, validate_isbn};
use stacks_core::LoanStatus;
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::console::{Console, RULE};
use crate::error::ShellResult;
use crate::state::AppState;

async fn ask_email_and_isbn<R, W>(console: &mut Console<R, W>) -> ShellResult<(String, String)>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let email = console.ask("Patron email: ").await?;
    let isbn = console.ask("ISBN: ").await?;
    Ok((validate_email(&email)?, validate_isbn(&isbn)?))
}

/// Librarian: lend a copy to a patron.
pub async fn assign_book<R, W>(state: &AppState, console: &mut Console<R, W>) -> ShellResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console.say("Assign book: [patron email][book isbn]").await?;
    let (email, isbn) = ask_email_and_isbn(console).await?;

    let loan = state
        .lending()
        .assign_book(&email, &isbn, state.today())
        .await?;

    let title = state
        .db()
        .catalog()
        .get_book(&loan.isbn)
        .await?
        .map(|book| book.title)
        .unwrap_or_else(|| loan.isbn.clone());

    console
        .say(format!(
            "Successfully checked book out to {}. '{}' is due on {}.",
            loan.email,
            title,
            format_date(loan.due_date)
        ))
        .await?;
    console.blank().await
}

/// Librarian: take a copy back and report any late charge.
pub async fn return_book<R, W>(state: &AppState, console: &mut Console<R, W>) -> ShellResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console.say("Return book: [patron email][book isbn]").await?;
    let (email, isbn) = ask_email_and_isbn(console).await?;

    let receipt = state
        .lending()
        .return_book(&email, &isbn, state.today())
        .await?;

    if receipt.was_late() {
        console
            .say(format!(
                "Your book is overdue by {} day(s). Charge incurred: {}",
                receipt.overdue_days, receipt.charge
            ))
            .await?;
    } else {
        console
            .say("Thank you for returning your book on time. We appreciate it.")
            .await?;
    }
    console.blank().await
}

/// Librarian: every loan past its due date, oldest first.
pub async fn view_overdue<R, W>(state: &AppState, console: &mut Console<R, W>) -> ShellResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let today = state.today();
    console
        .heading(format!("Overdue Books (Current Date: {}):", format_date(today)))
        .await?;

    let lending = state.lending();
    let mut overdue = lending.list_overdue(today);
    let mut shown = 0;

    while let Some(loan) = overdue.try_next().await? {
        if shown > 0 {
            console.say(RULE).await?;
        }
        console.say(format!("ISBN: {}", loan.isbn)).await?;
        console.say(format!("Patron Email: {}", loan.email)).await?;
        console
            .say(format!("Borrow Date: {}", format_date(loan.borrow_date)))
            .await?;
        console
            .say(format!("Due Date: {}", format_date(loan.due_date)))
            .await?;
        shown += 1;
    }

    if shown == 0 {
        console.say("No overdue books.").await?;
    }
    console.blank().await
}

/// Patron: their own loans with due status.
pub async fn my_books<R, W>(
    state: &AppState,
    console: &mut Console<R, W>,
    email: &str,
) -> ShellResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let items = state
        .lending()
        .list_borrowed_by_patron(email, state.today())
        .await?;

    console.heading("My Borrowed Books: ").await?;
    if items.is_empty() {
        console.say("You have no books checked out.").await?;
    }

    for (i, item) in items.iter().enumerate() {
        console.say(format!("Title: {}", item.title)).await?;
        console
            .say(format!("Due Date: {}", format_date(item.due_date)))
            .await?;
        match item.status {
            LoanStatus::Overdue { charge, .. } => {
                console
                    .say("Your book is overdue. Please return as soon as possible.")
                    .await?;
                console
                    .say(format!("Current overdue charge: {}", charge))
                    .await?;
            }
            LoanStatus::DueToday => {
                console.say("Your book is due today. Please return").await?;
                console
                    .say("by 11:59 PM to avoid incurring an overdue charge.")
                    .await?;
            }
            LoanStatus::Upcoming { days_remaining } => {
                console
                    .say(format!("This book is due in {} days.", days_remaining))
                    .await?;
            }
        }
        if i + 1 < items.len() {
            console.say(RULE).await?;
        }
    }
    console.blank().await
}
