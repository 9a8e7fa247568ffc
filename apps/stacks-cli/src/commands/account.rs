//! Signup and login.

use stacks_core::{Session, SignupForm};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::info;

use crate::console::Console;
use crate::error::ShellResult;
use crate::state::AppState;

/// Registers a new patron.
pub async fn sign_up<R, W>(state: &AppState, console: &mut Console<R, W>) -> ShellResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let form = SignupForm {
        first_name: console.ask("Enter first name: ").await?,
        last_name: console.ask("Enter last name: ").await?,
        dob: console.ask("Enter date of birth (MM/DD/YYYY): ").await?,
        email: console.ask("Enter email: ").await?,
        credential: console.ask("Enter password: ").await?,
    };

    let user = state.db().accounts().sign_up(&form).await?;

    info!(email = %user.email, "Patron signed up");
    console.say("Patron signup successful.").await?;
    console.blank().await
}

/// Verifies credentials and opens a session.
pub async fn log_in<R, W>(state: &AppState, console: &mut Console<R, W>) -> ShellResult<Session>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let email = console.ask("Email: ").await?;
    let credential = console.ask("Password: ").await?;

    let user = state.db().accounts().authenticate(&email, &credential).await?;

    console.say("Login successful.").await?;
    console.blank().await?;
    Ok(Session::for_user(&user))
}
