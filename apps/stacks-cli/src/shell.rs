//! # Menu Loop
//!
//! The role-gated menus. The session is a plain value owned by the loop:
//! created at login, replaced at logout, dropped at quit.
//!
//! ## Menu Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────── Main Menu ────────────┐                                 │
//! │   │ 1: Sign up   2: Login   q: quit   │                                 │
//! │   └───────────────┬───────────────────┘                                 │
//! │                   │ login                                               │
//! │          ┌────────┴─────────┐                                           │
//! │          ▼                  ▼                                           │
//! │   Librarian Menu       Patron Menu                                      │
//! │   1 Assign book        1 Search by subject                              │
//! │   2 Process return     2 Search by author                               │
//! │   3 Book catalog       3 My borrowed books                              │
//! │   4 Patrons            4 Recommendation                                 │
//! │   5 Overdue books      l logout / q quit                                │
//! │   l logout / q quit                                                     │
//! │                                                                         │
//! │   A failed action prints its message and the same menu comes back.     │
//! │   End of input quits from any prompt.                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use stacks_core::{Role, Session};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{info, warn};

use crate::commands::{account, catalog, lending};
use crate::console::Console;
use crate::error::{ShellError, ShellResult};
use crate::state::AppState;

/// What the loop does after a menu action.
#[derive(Debug)]
enum Next {
    Stay,
    SignIn(Session),
    SignOut,
    Quit,
}

/// Runs menus until the user quits or input ends.
pub async fn run<R, W>(state: &AppState, console: &mut Console<R, W>) -> ShellResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = Session::default();

    loop {
        let step = match &session {
            Session::Anonymous => main_menu(state, console).await,
            Session::SignedIn {
                email,
                role: Role::Librarian,
            } => librarian_menu(state, console, email).await,
            Session::SignedIn {
                email,
                role: Role::Patron,
            } => patron_menu(state, console, email).await,
        };

        match step {
            Ok(Next::Stay) => {}
            Ok(Next::SignIn(signed_in)) => session = signed_in,
            Ok(Next::SignOut) => {
                info!(email = ?session.email(), "Logged out");
                session = Session::Anonymous;
                console.blank().await?;
            }
            Ok(Next::Quit) | Err(ShellError::Closed) => {
                console.say("Goodbye.").await?;
                return Ok(());
            }
            Err(ShellError::Failure(failure)) => {
                warn!(code = ?failure.code, message = %failure.message, "Action failed");
                console.say(&failure.message).await?;
                console.blank().await?;
            }
            Err(err @ ShellError::Io(_)) => return Err(err),
        }
    }
}

async fn invalid<R, W>(console: &mut Console<R, W>) -> ShellResult<Next>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console.say("Sorry, that was not a valid selection.").await?;
    console.blank().await?;
    Ok(Next::Stay)
}

async fn main_menu<R, W>(state: &AppState, console: &mut Console<R, W>) -> ShellResult<Next>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console.say("---------------- Main Menu ----------------").await?;
    console.say("Select Option: ").await?;
    console.say("1: Sign up").await?;
    console.say("2: Login").await?;
    console.say("q: quit").await?;

    match console.ask("Selection: ").await?.trim() {
        "1" => {
            account::sign_up(state, console).await?;
            Ok(Next::Stay)
        }
        "2" => Ok(Next::SignIn(account::log_in(state, console).await?)),
        "q" | "Q" => Ok(Next::Quit),
        _ => invalid(console).await,
    }
}

async fn librarian_menu<R, W>(
    state: &AppState,
    console: &mut Console<R, W>,
    email: &str,
) -> ShellResult<Next>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console
        .say(format!("---------------- Librarian Menu ({email}) ----------------"))
        .await?;
    console.say("Select Option: ").await?;
    console.say("1: Assign book to patron").await?;
    console.say("2: Process book return").await?;
    console.say("3: View book catalog").await?;
    console.say("4: View registered patrons").await?;
    console.say("5: View overdue books").await?;
    console.say("l: logout").await?;
    console.say("q: quit").await?;

    match console.ask("Selection: ").await?.trim() {
        "1" => lending::assign_book(state, console).await?,
        "2" => lending::return_book(state, console).await?,
        "3" => catalog::view_catalog(state, console).await?,
        "4" => catalog::view_patrons(state, console).await?,
        "5" => lending::view_overdue(state, console).await?,
        "l" | "L" => return Ok(Next::SignOut),
        "q" | "Q" => return Ok(Next::Quit),
        _ => return invalid(console).await,
    }
    Ok(Next::Stay)
}

async fn patron_menu<R, W>(
    state: &AppState,
    console: &mut Console<R, W>,
    email: &str,
) -> ShellResult<Next>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    console
        .say(format!("---------------- Patron Menu ({email}) ----------------"))
        .await?;
    console.say("Select Option: ").await?;
    console.say("1: Search by subject").await?;
    console.say("2: Search by author").await?;
    console.say("3: View my borrowed books").await?;
    console.say("4: Get a book recommendation").await?;
    console.say("l: logout").await?;
    console.say("q: quit").await?;

    match console.ask("Selection: ").await?.trim() {
        "1" => catalog::search_by_subject(state, console).await?,
        "2" => catalog::search_by_author(state, console).await?,
        "3" => lending::my_books(state, console, email).await?,
        "4" => catalog::recommend(state, console).await?,
        "l" | "L" => return Ok(Next::SignOut),
        "q" | "Q" => return Ok(Next::Quit),
        _ => return invalid(console).await,
    }
    Ok(Next::Stay)
}
