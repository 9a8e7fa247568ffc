//! # Settings
//!
//! Console settings loaded once at startup. Read-only afterwards.
//!
//! ## Sources (later wins)
//! 1. Defaults (this file)
//! 2. `stacks.toml` in the working directory, if present
//! 3. The file passed with `--config`
//! 4. Environment variables (`STACKS_*`, e.g. `STACKS_LOAN_PERIOD_DAYS=21`)
//!
//! Command-line flags are applied on top by `main`.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use stacks_core::{
    LoanPolicy, Money, DEFAULT_DAILY_CHARGE_CENTS, DEFAULT_LOAN_PERIOD_DAYS,
    MAX_DAILY_CHARGE_CENTS, MAX_LOAN_PERIOD_DAYS,
};
use stacks_db::DbConfig;

const LOCAL_CONFIG: &str = "stacks";
const ENV_PREFIX: &str = "STACKS";
const DEFAULT_LOG_FILTER: &str = "info,stacks=debug,sqlx=warn";

/// Console settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// SQLite database file.
    /// Default: platform data directory, `stacks.db`
    pub database_path: PathBuf,

    /// Pool size.
    /// Default: 5
    pub max_connections: u32,

    /// Days a book may be kept.
    /// Default: 14, at most `MAX_LOAN_PERIOD_DAYS`
    pub loan_period_days: i64,

    /// Overdue charge per day, in cents.
    /// Default: 25, at most `MAX_DAILY_CHARGE_CENTS`
    pub daily_charge_cents: i64,

    /// `tracing` filter directive, used when `RUST_LOG` is unset.
    pub log_filter: String,
}

/// Settings that failed to load or made no sense.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error(transparent)]
    Source(#[from] config::ConfigError),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl Settings {
    /// Loads settings from every source in priority order.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder =
            Self::defaults()?.add_source(File::with_name(LOCAL_CONFIG).required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX));

        Self::finish(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, SettingsError> {
        let builder = Config::builder()
            .set_default(
                "database_path",
                default_database_path().to_string_lossy().into_owned(),
            )?
            .set_default("max_connections", 5_i64)?
            .set_default("loan_period_days", DEFAULT_LOAN_PERIOD_DAYS)?
            .set_default("daily_charge_cents", DEFAULT_DAILY_CHARGE_CENTS)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?;
        Ok(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.max_connections == 0 {
            return Err(SettingsError::InvalidValue {
                key: "max_connections",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(1..=MAX_LOAN_PERIOD_DAYS).contains(&self.loan_period_days) {
            return Err(SettingsError::InvalidValue {
                key: "loan_period_days",
                reason: format!("must be between 1 and {MAX_LOAN_PERIOD_DAYS}"),
            });
        }
        if !(0..=MAX_DAILY_CHARGE_CENTS).contains(&self.daily_charge_cents) {
            return Err(SettingsError::InvalidValue {
                key: "daily_charge_cents",
                reason: format!("must be between 0 and {MAX_DAILY_CHARGE_CENTS}"),
            });
        }
        Ok(())
    }

    pub fn loan_policy(&self) -> LoanPolicy {
        LoanPolicy::new(
            self.loan_period_days,
            Money::from_cents(self.daily_charge_cents),
        )
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path).max_connections(self.max_connections)
    }
}

/// `~/.local/share/stacks/stacks.db` on Linux, the platform equivalent
/// elsewhere, or `./stacks.db` when there is no home directory.
fn default_database_path() -> PathBuf {
    match ProjectDirs::from("org", "stacks", "stacks") {
        Some(dirs) => dirs.data_dir().join("stacks.db"),
        None => PathBuf::from("stacks.db"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn from_file(contents: &str) -> Result<Settings, SettingsError> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        Settings::finish(Settings::defaults()?.add_source(File::from(file.path())))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::finish(Settings::defaults().unwrap()).unwrap();
        assert_eq!(settings.max_connections, 5);
        assert_eq!(settings.loan_policy(), LoanPolicy::default());
        assert!(settings.database_path.ends_with("stacks.db"));
        assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let settings = from_file(
            r#"
            database_path = "/tmp/library.db"
            loan_period_days = 21
            daily_charge_cents = 10
            "#,
        )
        .unwrap();

        assert_eq!(settings.database_path, PathBuf::from("/tmp/library.db"));
        assert_eq!(settings.loan_policy().loan_period_days, 21);
        assert_eq!(settings.loan_policy().daily_charge, Money::from_cents(10));
        assert_eq!(settings.max_connections, 5);
        assert_eq!(settings.db_config().database_path, PathBuf::from("/tmp/library.db"));
    }

    #[test]
    fn test_rejects_nonsense_values() {
        assert!(matches!(
            from_file("loan_period_days = 0"),
            Err(SettingsError::InvalidValue { key: "loan_period_days", .. })
        ));
        assert!(matches!(
            from_file("daily_charge_cents = -5"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            from_file("max_connections = 0"),
            Err(SettingsError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_rejects_values_that_would_overflow() {
        assert!(matches!(
            from_file("loan_period_days = 100000000"),
            Err(SettingsError::InvalidValue { key: "loan_period_days", .. })
        ));
        assert!(matches!(
            from_file("daily_charge_cents = 4611686018427387903"),
            Err(SettingsError::InvalidValue { key: "daily_charge_cents", .. })
        ));

        let widest = format!(
            "loan_period_days = {MAX_LOAN_PERIOD_DAYS}\n\
             daily_charge_cents = {MAX_DAILY_CHARGE_CENTS}"
        );
        let widest = from_file(&widest).unwrap();
        let today = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let policy = widest.loan_policy();
        assert!(policy.due_date(today).is_ok());
        assert!(policy.charge_for(365 * 10_000).is_ok());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let missing = Path::new("/definitely/not/here/stacks.toml");
        assert!(Settings::load(Some(missing)).is_err());
    }
}
