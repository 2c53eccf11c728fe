//! Migration backends that do not go through the embedded migrator.

use crate::error::{GateError, Result};
use crate::gate::{MigrationOutcome, SchemaMigrator};
use async_trait::async_trait;
use tokio::process::Command;

/// Runs an external migration tool, e.g. `alembic upgrade head`.
///
/// The child inherits stdio and environment, so `DATABASE_URL` reaches it
/// unchanged.
#[derive(Clone, Debug)]
pub struct CommandMigrator {
    program: String,
    args: Vec<String>,
}

impl CommandMigrator {
    pub fn new(command: Vec<String>) -> Result<Self> {
        let mut parts = command.into_iter();
        let program = parts
            .next()
            .ok_or_else(|| GateError::ConfigError("Migration command is empty".to_string()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl SchemaMigrator for CommandMigrator {
    async fn migrate(&self) -> Result<MigrationOutcome> {
        tracing::info!(command = %self.command_line(), "Running migration command");

        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .await?;

        if status.success() {
            Ok(MigrationOutcome::Applied)
        } else {
            Err(GateError::MigrationCommand(format!(
                "`{}` exited with {}",
                self.command_line(),
                status
            )))
        }
    }
}

pub struct NoopMigrator;

#[async_trait]
impl SchemaMigrator for NoopMigrator {
    async fn migrate(&self) -> Result<MigrationOutcome> {
        Ok(MigrationOutcome::Skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migrator(parts: &[&str]) -> CommandMigrator {
        CommandMigrator::new(parts.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(matches!(
            CommandMigrator::new(Vec::new()),
            Err(GateError::ConfigError(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_command() {
        let outcome = migrator(&["sh", "-c", "exit 0"]).migrate().await.unwrap();
        assert_eq!(outcome, MigrationOutcome::Applied);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_command() {
        let err = migrator(&["sh", "-c", "exit 3"]).migrate().await.unwrap_err();
        match err {
            GateError::MigrationCommand(msg) => assert!(msg.contains("sh -c exit 3")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = migrator(&["work21-no-such-migration-tool"])
            .migrate()
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::IoError(_)));
    }

    #[tokio::test]
    async fn test_noop() {
        assert_eq!(NoopMigrator.migrate().await.unwrap(), MigrationOutcome::Skipped);
    }
}
