//! # Stacks
//!
//! Entry point for the lending console.
//!
//! ```text
//! stacks [--config FILE] [--database FILE] [--today MM/DD/YYYY]
//! ```

use anyhow::Context;
use clap::Parser;
use stacks_cli::cli::Cli;
use stacks_cli::{init_tracing, shell, AppState, Clock, Console, Settings};
use stacks_db::Database;
use tokio::io::BufReader;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings =
        Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(path) = cli.database {
        settings.database_path = path;
    }

    init_tracing(&settings.log_filter);
    info!(database = %settings.database_path.display(), "Starting Stacks console");

    if let Some(parent) = settings.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }

    let db = Database::new(settings.db_config())
        .await
        .context("Failed to open database")?;

    let clock = cli.today.map(Clock::Fixed).unwrap_or_default();
    let state = AppState::new(db.clone(), settings.loan_policy(), clock);

    let mut console = Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    let outcome = shell::run(&state, &mut console).await;

    db.close().await;
    outcome.context("Console I/O failed")?;

    info!("Stacks console stopped");
    Ok(())
}
