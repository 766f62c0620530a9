//! repo-retention - Main entry point
//!
//! Drives the retention reconciler against a JSON state file.

use anyhow::{Context, Result};
use std::io::IsTerminal;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use repo_retention::cli::{Cli, Commands, RetentionFlags};
use repo_retention::state_file::{JsonStateStore, RetentionState};
use repo_retention::{ApplyOutcome, apply_retention, verify_store};

const DEFAULT_LOG_FILTER: &str = "warn,repo_retention=info";

/// Initialize tracing; `--log-filter` wins over RUST_LOG, which wins over the default
fn init_tracing(cli_filter: Option<&str>) {
    let filter = match cli_filter {
        Some(filter) => EnvFilter::new(filter),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.log_filter.as_deref());
    debug!("CLI arguments parsed");

    if let Err(e) = run(cli.command) {
        debug!(error = ?e, "command failed");
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Init {
            state,
            force,
            retention,
        } => {
            if state.exists() && !force {
                anyhow::bail!(
                    "State file {:?} already exists (use --force to overwrite)",
                    state
                );
            }
            info!("Initializing retention state at {:?}", state);
            let (_, outcome) = JsonStateStore::initialize(&state, &retention.to_request())
                .with_context(|| format!("Failed to initialize {:?}", state))?;
            report(outcome);
            show(&state)
        }
        Commands::Set { state, retention } => {
            if !state.exists() {
                anyhow::bail!("State file {:?} does not exist (run init first)", state);
            }
            apply_flags(JsonStateStore::new(&state), &retention)?;
            show(&state)
        }
        Commands::Show { state } => show(&state),
        Commands::Verify { state } => {
            verify_store(&JsonStateStore::new(&state))?;
            println!("✓ Retention configuration is consistent: {:?}", state);
            Ok(())
        }
    }
}

fn apply_flags(mut store: JsonStateStore, flags: &RetentionFlags) -> Result<()> {
    let outcome = apply_retention(&mut store, &flags.to_request())
        .with_context(|| format!("Failed to update {:?}", store.path()))?;
    report(outcome);
    Ok(())
}

fn report(outcome: ApplyOutcome) {
    if outcome.is_unchanged() {
        println!("Retention configuration unchanged");
    } else {
        println!(
            "Updated:{}{}",
            if outcome.blob_written { " blob storage config" } else { "" },
            if outcome.params_written { " maintenance params" } else { "" },
        );
    }
}

fn show(path: &Path) -> Result<()> {
    let state = RetentionState::load_from_file(path)?;
    let json = serde_json::to_string_pretty(&state).context("Failed to render retention state")?;
    println!("{}", json);
    Ok(())
}
