use crate::database_url::DatabaseUrl;
use crate::error::{GateError, Result};
use crate::gate::{MigrationOutcome, Probe, SchemaMigrator};
use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::time::Duration;
use work21_migration::{Migrator, MigratorTrait};

// Single-connection pool; the gate never does concurrent work
fn connect_options(url: &DatabaseUrl, timeout: Duration) -> ConnectOptions {
    let mut opt = ConnectOptions::new(url.as_str().to_string());
    opt.max_connections(1)
        .min_connections(1)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);
    opt
}

pub async fn connect(url: &DatabaseUrl, timeout: Duration) -> Result<DatabaseConnection> {
    tracing::debug!("🔗 Connecting to database: {}", url);
    let db = Database::connect(connect_options(url, timeout)).await?;
    Ok(db)
}

/// Opens a connection and runs `SELECT 1`, all within `timeout`.
#[derive(Clone, Debug)]
pub struct DatabaseProbe {
    url: DatabaseUrl,
    timeout: Duration,
}

impl DatabaseProbe {
    pub fn new(url: DatabaseUrl, timeout: Duration) -> Self {
        Self { url, timeout }
    }
}

#[async_trait]
impl Probe for DatabaseProbe {
    async fn probe(&self) -> Result<()> {
        let attempt = async {
            let db = connect(&self.url, self.timeout).await?;
            db.execute_unprepared("SELECT 1").await?;
            Ok::<_, GateError>(())
        };

        tokio::time::timeout(self.timeout, attempt)
            .await
            .map_err(|_| GateError::ProbeTimeout(self.timeout))?
    }
}

/// Applies the migrations bundled in `work21-migration`.
#[derive(Clone, Debug)]
pub struct EmbeddedMigrator {
    url: DatabaseUrl,
    timeout: Duration,
}

impl EmbeddedMigrator {
    pub fn new(url: DatabaseUrl, timeout: Duration) -> Self {
        Self { url, timeout }
    }
}

#[async_trait]
impl SchemaMigrator for EmbeddedMigrator {
    async fn migrate(&self) -> Result<MigrationOutcome> {
        let db = connect(&self.url, self.timeout).await?;

        let pending = Migrator::get_pending_migrations(&db).await?;
        tracing::info!(pending = pending.len(), "Running database migrations");

        Migrator::up(&db, None).await?;
        Ok(MigrationOutcome::Applied)
    }
}
