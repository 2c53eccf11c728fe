//! The startup gate state machine.
//!
//! ```text
//! WAITING --probe ok--> MIGRATING --> STARTING
//!    |
//!    +--attempts exhausted--> FAILED
//! ```
//!
//! `MIGRATING` always moves on to `STARTING`: a failed migration is logged and
//! the server is started against whatever schema is in place.

use crate::config::RetryPolicy;
use crate::error::{GateError, Result};
use async_trait::async_trait;
use std::fmt;

/// A cheap reachability check against the database.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self) -> Result<()>;
}

/// Brings the schema up to date.
#[async_trait]
pub trait SchemaMigrator: Send + Sync {
    async fn migrate(&self) -> Result<MigrationOutcome>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Waiting { attempt: u32 },
    Migrating,
    Starting,
    Failed,
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateState::Waiting { attempt } => write!(f, "waiting (attempt {attempt})"),
            GateState::Migrating => f.write_str("migrating"),
            GateState::Starting => f.write_str("starting"),
            GateState::Failed => f.write_str("failed"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MigrationOutcome {
    Applied,
    Skipped,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GateReport {
    /// Probes made, including the successful one
    pub attempts: u32,
    pub migration: MigrationOutcome,
}

pub struct StartupGate {
    probe: Box<dyn Probe>,
    migrator: Box<dyn SchemaMigrator>,
    policy: RetryPolicy,
}

impl StartupGate {
    pub fn new(
        probe: impl Probe + 'static,
        migrator: impl SchemaMigrator + 'static,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            probe: Box::new(probe),
            migrator: Box::new(migrator),
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs the gate up to the point of handoff.
    ///
    /// Returns [`GateError::DatabaseUnavailable`] when every probe failed; the
    /// migrator is never called in that case.
    pub async fn run(&self) -> Result<GateReport> {
        let attempts = self.wait_for_database().await?;
        let migration = self.migrate().await;

        tracing::info!(state = %GateState::Starting, attempts, "Startup gate open");
        Ok(GateReport {
            attempts,
            migration,
        })
    }

    async fn wait_for_database(&self) -> Result<u32> {
        let max_attempts = self.policy.max_attempts;
        let mut last_error = String::from("no probe attempted");

        for attempt in 1..=max_attempts {
            tracing::debug!(state = %GateState::Waiting { attempt }, "Probing database");

            match self.probe.probe().await {
                Ok(()) => {
                    tracing::info!(attempt, "⏳ Database is reachable");
                    return Ok(attempt);
                }
                Err(e) => {
                    tracing::info!(
                        attempt,
                        max_attempts,
                        error = %e,
                        "⏳ Database not ready yet"
                    );
                    last_error = e.to_string();
                }
            }

            // No wait after the final attempt
            if attempt < max_attempts {
                tokio::time::sleep(self.policy.interval).await;
            }
        }

        tracing::error!(
            state = %GateState::Failed,
            attempts = max_attempts,
            error = %last_error,
            "❌ Database did not become reachable"
        );
        Err(GateError::DatabaseUnavailable {
            attempts: max_attempts,
            last_error,
        })
    }

    async fn migrate(&self) -> MigrationOutcome {
        tracing::info!(state = %GateState::Migrating, "🔄 Applying schema migrations...");

        match self.migrator.migrate().await {
            Ok(MigrationOutcome::Skipped) => {
                tracing::info!("Migrations disabled, skipping");
                MigrationOutcome::Skipped
            }
            Ok(outcome) => {
                tracing::info!("✅ Migrations completed successfully");
                outcome
            }
            Err(e) => {
                tracing::warn!(error = %e, "⚠️ Migrations failed, starting server anyway");
                MigrationOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Fails until the `ready_on`-th call. `None` never succeeds.
    struct FlakyProbe {
        ready_on: Option<u32>,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl Probe for FlakyProbe {
        async fn probe(&self) -> Result<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            match self.ready_on {
                Some(n) if call >= n => Ok(()),
                _ => Err(GateError::ConfigError("connection refused".to_string())),
            }
        }
    }

    struct RecordingMigrator {
        fail: bool,
        calls: Arc<AtomicU32>,
    }

    #[async_trait]
    impl SchemaMigrator for RecordingMigrator {
        async fn migrate(&self) -> Result<MigrationOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(GateError::MigrationCommand("relation already exists".to_string()))
            } else {
                Ok(MigrationOutcome::Applied)
            }
        }
    }

    struct Harness {
        gate: StartupGate,
        probes: Arc<AtomicU32>,
        migrations: Arc<AtomicU32>,
    }

    fn harness(ready_on: Option<u32>, migration_fails: bool) -> Harness {
        let probes = Arc::new(AtomicU32::new(0));
        let migrations = Arc::new(AtomicU32::new(0));
        let gate = StartupGate::new(
            FlakyProbe {
                ready_on,
                calls: probes.clone(),
            },
            RecordingMigrator {
                fail: migration_fails,
                calls: migrations.clone(),
            },
            RetryPolicy::default(),
        );
        Harness {
            gate,
            probes,
            migrations,
        }
    }

    fn assert_elapsed(start: Instant, expected: Duration) {
        let elapsed = start.elapsed();
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(100),
            "elapsed {elapsed:?}, expected {expected:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_on_first_probe() {
        let h = harness(Some(1), false);
        let start = Instant::now();

        let report = h.gate.run().await.unwrap();

        assert_eq!(report.attempts, 1);
        assert_eq!(report.migration, MigrationOutcome::Applied);
        assert_eq!(h.probes.load(Ordering::SeqCst), 1);
        assert_eq!(h.migrations.load(Ordering::SeqCst), 1);
        assert_elapsed(start, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_after_several_probes() {
        let h = harness(Some(7), false);
        let start = Instant::now();

        let report = h.gate.run().await.unwrap();

        assert_eq!(report.attempts, 7);
        assert_eq!(h.probes.load(Ordering::SeqCst), 7);
        assert_eq!(h.migrations.load(Ordering::SeqCst), 1);
        // Six waits between seven probes
        assert_elapsed(start, Duration::from_secs(2) * 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_on_last_allowed_probe() {
        let h = harness(Some(30), false);

        let report = h.gate.run().await.unwrap();

        assert_eq!(report.attempts, 30);
        assert_eq!(h.migrations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_never_ready() {
        let h = harness(None, false);
        let start = Instant::now();

        let err = h.gate.run().await.unwrap_err();

        match err {
            GateError::DatabaseUnavailable {
                attempts,
                last_error,
            } => {
                assert_eq!(attempts, 30);
                assert!(last_error.contains("connection refused"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(h.probes.load(Ordering::SeqCst), 30);
        assert_eq!(h.migrations.load(Ordering::SeqCst), 0);
        assert_elapsed(start, Duration::from_secs(2) * 29);
    }

    #[tokio::test(start_paused = true)]
    async fn test_migration_failure_is_not_fatal() {
        let h = harness(Some(2), true);

        let report = h.gate.run().await.unwrap();

        assert_eq!(report.attempts, 2);
        assert_eq!(h.migrations.load(Ordering::SeqCst), 1);
        match report.migration {
            MigrationOutcome::Failed(msg) => assert!(msg.contains("relation already exists")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_policy() {
        let probes = Arc::new(AtomicU32::new(0));
        let gate = StartupGate::new(
            FlakyProbe {
                ready_on: None,
                calls: probes.clone(),
            },
            RecordingMigrator {
                fail: false,
                calls: Arc::new(AtomicU32::new(0)),
            },
            RetryPolicy {
                max_attempts: 3,
                interval: Duration::from_millis(500),
                ..RetryPolicy::default()
            },
        );
        let start = Instant::now();

        assert!(gate.run().await.is_err());
        assert_eq!(probes.load(Ordering::SeqCst), 3);
        assert_elapsed(start, Duration::from_secs(1));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(GateState::Waiting { attempt: 3 }.to_string(), "waiting (attempt 3)");
        assert_eq!(GateState::Migrating.to_string(), "migrating");
        assert_eq!(GateState::Failed.to_string(), "failed");
    }
}
