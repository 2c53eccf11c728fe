use crate::database_url::DatabaseUrl;
use crate::error::{GateError, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MIGRATION_COMMAND: &str = "alembic upgrade head";

/// How long to keep probing the database, and how often.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
    pub probe_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_RETRY_INTERVAL,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MigrationMode {
    /// Apply the migrations compiled into this binary
    Embedded,
    /// Run an external migration tool, program followed by its arguments
    Command(Vec<String>),
    Skip,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: DatabaseUrl,
    pub retry: RetryPolicy,
    pub migration: MigrationMode,
    /// Fallback server command when none is given on the command line
    pub server_command: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| GateError::ConfigError("DATABASE_URL is not set".to_string()))?;

        let retry = RetryPolicy {
            max_attempts: parse_or(&lookup, "GATE_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            interval: Duration::from_secs(parse_or(
                &lookup,
                "GATE_RETRY_INTERVAL_SECS",
                DEFAULT_RETRY_INTERVAL.as_secs(),
            )?),
            probe_timeout: Duration::from_secs(parse_or(
                &lookup,
                "GATE_PROBE_TIMEOUT_SECS",
                DEFAULT_PROBE_TIMEOUT.as_secs(),
            )?),
        };

        let migration = match lookup("GATE_MIGRATION_MODE")
            .unwrap_or_else(|| "embedded".to_string())
            .to_lowercase()
            .as_str()
        {
            "embedded" => MigrationMode::Embedded,
            "command" => {
                let command = lookup("GATE_MIGRATION_COMMAND")
                    .unwrap_or_else(|| DEFAULT_MIGRATION_COMMAND.to_string());
                MigrationMode::Command(split_command("GATE_MIGRATION_COMMAND", &command)?)
            }
            "skip" | "none" => MigrationMode::Skip,
            other => {
                return Err(GateError::ConfigError(format!(
                    "Invalid GATE_MIGRATION_MODE '{other}': expected embedded, command or skip"
                )))
            }
        };

        let server_command = lookup("SERVER_COMMAND")
            .map(|raw| split_command("SERVER_COMMAND", &raw))
            .transpose()?;

        Ok(Config {
            database_url: DatabaseUrl::parse(&database_url)?,
            retry,
            migration,
            server_command,
        })
    }

    /// Checks the final values, after any command-line overrides.
    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(GateError::ConfigError("max attempts must be at least 1".to_string()));
        }
        if self.retry.probe_timeout.is_zero() {
            return Err(GateError::ConfigError(
                "probe timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| GateError::ConfigError(format!("Invalid {key} '{raw}'"))),
    }
}

fn split_command(key: &str, raw: &str) -> Result<Vec<String>> {
    let parts: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
        return Err(GateError::ConfigError(format!("{key} is empty")));
    }
    Ok(parts)
}
