use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GateError>;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),

    #[error("Probe timed out after {0:?}")]
    ProbeTimeout(Duration),

    #[error("Database unreachable after {attempts} attempts: {last_error}")]
    DatabaseUnavailable { attempts: u32, last_error: String },

    #[error("Migration command failed: {0}")]
    MigrationCommand(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to start server command `{program}`: {source}")]
    HandoffError {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
