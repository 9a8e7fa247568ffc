//! Command line flags for the `stacks` binary.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use stacks_core::dates::parse_date;

#[derive(Debug, Parser)]
#[command(name = "stacks", version, about = "Library lending console")]
pub struct Cli {
    /// Settings file (TOML), applied over `./stacks.toml`
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Database file, overriding every settings source
    #[arg(short, long)]
    pub database: Option<PathBuf>,

    /// Pretend today is this date (MM/DD/YYYY)
    #[arg(long, value_parser = parse_today)]
    pub today: Option<NaiveDate>,
}

fn parse_today(input: &str) -> Result<NaiveDate, String> {
    parse_date("today", input).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_all_flags() {
        let cli = Cli::try_parse_from([
            "stacks",
            "--config",
            "library.toml",
            "--database",
            "/tmp/stacks.db",
            "--today",
            "03/15/2024",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("library.toml")));
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/stacks.db")));
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 3, 15));
    }

    #[test]
    fn test_rejects_iso_today() {
        assert!(Cli::try_parse_from(["stacks", "--today", "2024-03-15"]).is_err());
    }

    #[test]
    fn test_no_flags() {
        let cli = Cli::try_parse_from(["stacks"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.today.is_none());
    }
}
