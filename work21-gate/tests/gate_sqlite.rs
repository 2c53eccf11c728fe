//! End-to-end gate runs against SQLite files.

use sea_orm::{ActiveModelBehavior, ActiveModelTrait, Set};
use std::collections::HashMap;
use tempfile::TempDir;
use work21_entity::user;
use work21_gate::config::Config;
use work21_gate::database;
use work21_gate::gate::MigrationOutcome;
use work21_gate::{run_gate, GateError};

fn config(vars: &[(&str, String)]) -> Config {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

fn sqlite_url(dir: &TempDir, query: &str) -> String {
    format!(
        "sqlite+aiosqlite://{}{}",
        dir.path().join("work21.db").display(),
        query
    )
}

#[tokio::test]
async fn test_gate_migrates_reachable_database() {
    let dir = TempDir::new().unwrap();
    let config = config(&[("DATABASE_URL", sqlite_url(&dir, "?mode=rwc"))]);

    let report = run_gate(&config).await.unwrap();
    assert_eq!(report.attempts, 1);
    assert_eq!(report.migration, MigrationOutcome::Applied);

    // Schema is usable by the application entities
    let db = database::connect(&config.database_url, config.retry.probe_timeout)
        .await
        .unwrap();
    let admin = user::ActiveModel {
        email: Set("admin@work21.ru".to_string()),
        hashed_password: Set("hash".to_string()),
        first_name: Set("Admin".to_string()),
        last_name: Set("Work21".to_string()),
        role: Set(user::UserRole::Admin),
        ..user::ActiveModel::new()
    }
    .insert(&db)
    .await
    .unwrap();
    assert_eq!(admin.role, user::UserRole::Admin);
}

#[tokio::test]
async fn test_gate_gives_up_on_unreachable_database() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing").join("work21.db");
    let config = config(&[
        ("DATABASE_URL", format!("sqlite://{}", missing.display())),
        ("GATE_MAX_ATTEMPTS", "3".to_string()),
        ("GATE_RETRY_INTERVAL_SECS", "0".to_string()),
    ]);

    match run_gate(&config).await {
        Err(GateError::DatabaseUnavailable { attempts, .. }) => assert_eq!(attempts, 3),
        other => panic!("unexpected result: {other:?}"),
    }
    // The migrator never ran, so nothing was created
    assert!(!missing.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_gate_survives_failing_migration_command() {
    let dir = TempDir::new().unwrap();
    let config = config(&[
        ("DATABASE_URL", sqlite_url(&dir, "?mode=rwc")),
        ("GATE_MIGRATION_MODE", "command".to_string()),
        ("GATE_MIGRATION_COMMAND", "false".to_string()),
    ]);

    let report = run_gate(&config).await.unwrap();
    assert!(matches!(report.migration, MigrationOutcome::Failed(_)));
}

#[tokio::test]
async fn test_gate_skip_mode_leaves_schema_alone() {
    let dir = TempDir::new().unwrap();
    let config = config(&[
        ("DATABASE_URL", sqlite_url(&dir, "?mode=rwc")),
        ("GATE_MIGRATION_MODE", "skip".to_string()),
    ]);

    let report = run_gate(&config).await.unwrap();
    assert_eq!(report.migration, MigrationOutcome::Skipped);

    let db = database::connect(&config.database_url, config.retry.probe_timeout)
        .await
        .unwrap();
    let manager = work21_migration::SchemaManager::new(&db);
    assert!(!manager.has_table("users").await.unwrap());
}
