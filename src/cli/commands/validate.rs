//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Fauna configuration file.

use crate::cli::{resolve_config, DEFAULT_CONFIG_PATH};
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&str>) -> anyhow::Result<i32> {
        let shown_path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
        tracing::info!(config_path = %shown_path, "Validating configuration");

        println!("🔍 Validating configuration file: {shown_path}");
        if config_path.is_none() && !Path::new(DEFAULT_CONFIG_PATH).exists() {
            println!("   (file not found, checking defaults and FAUNA_* overrides)");
        }
        println!();

        // Loading also validates
        let config = match resolve_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Animal Service: {}", config.source.base_url);
        println!(
            "  Page Size: {}",
            config
                .source
                .per_page
                .map(|n| n.to_string())
                .unwrap_or_else(|| "service default".to_string())
        );
        println!("  Detail Concurrency: {}", config.source.detail_concurrency);
        println!("  Max Attempts: {}", config.retry.max_attempts);
        println!(
            "  Backoff: {}s x{} (max {}s, jitter {})",
            config.retry.base_delay_secs,
            config.retry.backoff_factor,
            config.retry.max_delay_secs,
            if config.retry.jitter { "on" } else { "off" }
        );
        println!("  Batch Size: {}", config.load.batch_size);
        println!("  Load Concurrency: {}", config.load.load_concurrency);
        println!("  Min Success Ratio: {}", config.load.min_success_ratio);
        println!();
        Ok(0)
    }
}
