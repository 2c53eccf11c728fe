use anyhow::{Context, Result};
use clap::Parser;
use std::ffi::OsString;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use work21_gate::config::{Config, MigrationMode};
use work21_gate::{run_gate, ServerCommand};

#[derive(Parser)]
#[command(name = "work21-gate")]
#[command(about = "Waits for the database, applies migrations, then execs the server")]
#[command(version)]
struct Cli {
    /// Maximum number of connection probes (overrides GATE_MAX_ATTEMPTS)
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Seconds to wait between probes (overrides GATE_RETRY_INTERVAL_SECS)
    #[arg(long)]
    interval_secs: Option<u64>,

    /// Per-probe timeout in seconds (overrides GATE_PROBE_TIMEOUT_SECS)
    #[arg(long)]
    probe_timeout_secs: Option<u64>,

    /// Do not run migrations
    #[arg(long, default_value_t = false)]
    skip_migrations: bool,

    /// Server command and its arguments; falls back to SERVER_COMMAND
    #[arg(last = true)]
    command: Vec<OsString>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(max_attempts) = self.max_attempts {
            config.retry.max_attempts = max_attempts;
        }
        if let Some(secs) = self.interval_secs {
            config.retry.interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.probe_timeout_secs {
            config.retry.probe_timeout = Duration::from_secs(secs);
        }
        if self.skip_migrations {
            config.migration = MigrationMode::Skip;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("work21_gate=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    // Resolve the server command before waiting so a typo fails fast
    let server = ServerCommand::resolve(cli.command.clone(), config.server_command.clone())
        .context("Nothing to hand off to")?;

    let report = run_gate(&config)
        .await
        .with_context(|| format!("Startup gate failed for {}", config.database_url))?;
    tracing::debug!(?report, "Gate report");

    Err(server.exec()).context("Handoff failed")
}
