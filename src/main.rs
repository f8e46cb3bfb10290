//! Tredgate loan tracker maintenance entry point
//!
//! Opens the on-disk collections, applies audit log retention when it is
//! configured, and reports the state of the ledger.

use std::sync::Arc;

use anyhow::{Context, Result};

use tredgate_loans::config::Config;
use tredgate_loans::storage::FileStore;
use tredgate_loans::AppState;

fn main() {
    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    if let Err(e) = run(&config) {
        tracing::error!(error = ?e, "Maintenance run failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    tracing::info!(
        environment = config.environment.as_str(),
        data_dir = %config.data_dir.display(),
        "Opening loan tracker storage"
    );

    let store = FileStore::open(&config.data_dir).with_context(|| {
        format!(
            "Failed to open data directory {}",
            config.data_dir.display()
        )
    })?;
    let state = AppState::new(Arc::new(store));

    if let Some(max_entries) = config.audit_max_entries {
        let removed = state
            .audit_service
            .prune_and_save(max_entries)
            .context("Failed to prune audit log")?;
        tracing::info!(removed, max_entries, "Audit log pruned");
    }

    let summary = state.loan_service.summary();
    tracing::info!(
        total = summary.total,
        pending = summary.pending,
        approved = summary.approved,
        rejected = summary.rejected,
        total_approved_amount = summary.total_approved_amount,
        "Loan summary"
    );
    tracing::info!(
        audit_entries = state.audit_service.load().len(),
        "Audit log loaded"
    );

    Ok(())
}
