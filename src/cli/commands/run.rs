//! Run command implementation
//!
//! This module implements the `run` command, which executes one full
//! extract/transform/load pass against the animal service.

use crate::cli::resolve_config;
use crate::config::FaunaConfig;
use crate::core::pipeline::{Pipeline, RunOutcome, RunSummary};
use clap::Args;
use tokio::sync::watch;

/// Most recovered errors printed after a run
const MAX_PRINTED_ERRORS: usize = 10;

/// Arguments for the run command
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Override the animal service base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Override the number of records per destination request
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Override the number of attempts per request
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Dry run mode - form batches without sending them
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = match resolve_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no batches will be sent");
            println!("🔍 DRY RUN MODE - No data will be sent to the destination");
            println!();
        }

        let min_success_ratio = config.load.min_success_ratio;
        let pipeline = match Pipeline::new(&config, shutdown_signal) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create pipeline");
                eprintln!("Failed to initialize run: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        println!("🚀 Starting run against {}", config.source.base_url);
        println!();

        let summary = match pipeline.run().await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(error = %e, "Run failed");
                eprintln!("Run failed: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        print_summary(&summary);

        let outcome = summary.outcome(min_success_ratio);
        match outcome {
            RunOutcome::Success => println!("✅ Run completed successfully!"),
            RunOutcome::CompletedWithErrors => println!("⚠️  Run completed with errors"),
            RunOutcome::Interrupted => {
                println!("⚠️  Run interrupted. In-flight batches were completed.");
                tracing::info!("Run interrupted by user signal");
            }
        }

        Ok(exit_code(outcome))
    }

    /// Apply command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut FaunaConfig) {
        if let Some(base_url) = &self.base_url {
            tracing::info!(base_url = %base_url, "Overriding base URL from CLI");
            config.source.base_url = base_url.clone();
        }

        if let Some(batch_size) = self.batch_size {
            tracing::info!(batch_size = batch_size, "Overriding batch size from CLI");
            config.load.batch_size = batch_size;
        }

        if let Some(max_attempts) = self.max_attempts {
            tracing::info!(max_attempts = max_attempts, "Overriding max attempts from CLI");
            config.retry.max_attempts = max_attempts;
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
    }
}

/// Process exit code for a finished run
pub fn exit_code(outcome: RunOutcome) -> i32 {
    match outcome {
        RunOutcome::Success => 0,
        RunOutcome::CompletedWithErrors => 1, // Partial success
        RunOutcome::Interrupted => 130,       // SIGINT exit code (standard Unix convention)
    }
}

fn print_summary(summary: &RunSummary) {
    let stats = &summary.stats;

    println!();
    println!("📊 Run Summary:");
    println!("  Listed: {}", stats.listed);
    println!("  Details Fetched: {}", stats.detail_fetched);
    println!("  Transformed: {}", stats.transformed);
    println!("  Skipped: {}", stats.records_skipped);
    println!(
        "  Batches: {} sent, {} failed",
        stats.batches_sent, stats.batches_failed
    );
    println!("  Records Loaded: {}", stats.records_loaded);
    println!("  Records Failed: {}", stats.records_failed);
    if summary.dry_run {
        println!(
            "  Records In Dry-Run Batches: {}",
            summary.load_report.records_dry_run()
        );
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_ratio() * 100.0);
    println!();

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in summary.errors.iter().take(MAX_PRINTED_ERRORS) {
            println!("  - {:?}: {}", error.error_type, error.message);
            if let Some(context) = &error.context {
                println!("    Context: {context}");
            }
        }
        if summary.errors.len() > MAX_PRINTED_ERRORS {
            println!(
                "  ... and {} more errors",
                summary.errors.len() - MAX_PRINTED_ERRORS
            );
        }
        println!();
    }
}
