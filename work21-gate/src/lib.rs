pub mod config;
pub mod database;
pub mod database_url;
pub mod error;
pub mod gate;
pub mod handoff;
pub mod migrator;

use config::{Config, MigrationMode};
use database::{DatabaseProbe, EmbeddedMigrator};
use error::Result;
use gate::{GateReport, StartupGate};
use migrator::{CommandMigrator, NoopMigrator};

pub use database_url::DatabaseUrl;
pub use error::GateError;
pub use handoff::ServerCommand;

/// Assembles the gate described by `config`.
pub fn build_gate(config: &Config) -> Result<StartupGate> {
    let probe = DatabaseProbe::new(config.database_url.clone(), config.retry.probe_timeout);

    let gate = match &config.migration {
        MigrationMode::Embedded => StartupGate::new(
            probe,
            EmbeddedMigrator::new(config.database_url.clone(), config.retry.probe_timeout),
            config.retry,
        ),
        MigrationMode::Command(command) => StartupGate::new(
            probe,
            CommandMigrator::new(command.clone())?,
            config.retry,
        ),
        MigrationMode::Skip => StartupGate::new(probe, NoopMigrator, config.retry),
    };
    Ok(gate)
}

/// Waits for the database and migrates. The caller performs the handoff.
pub async fn run_gate(config: &Config) -> Result<GateReport> {
    let gate = build_gate(config)?;

    tracing::info!(
        database = %config.database_url,
        max_attempts = gate.policy().max_attempts,
        interval = ?gate.policy().interval,
        "Waiting for database"
    );

    gate.run().await
}
