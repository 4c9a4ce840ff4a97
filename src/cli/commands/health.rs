//! Health command implementation

use crate::adapters::animals::AnimalApiClient;
use crate::cli::resolve_config;
use crate::config::FaunaConfig;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the health command
#[derive(Args, Debug)]
pub struct HealthArgs {}

impl HealthArgs {
    /// Execute the health command
    pub async fn execute(
        &self,
        config_path: Option<&str>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let config = match resolve_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        Ok(check_service(&config, shutdown_signal).await)
    }
}

/// Check the animal service and map the result to an exit code
///
/// Both a client that cannot be built and a service that does not answer
/// report 4, the same code `run` uses when it cannot reach the service.
pub async fn check_service(config: &FaunaConfig, shutdown_signal: watch::Receiver<bool>) -> i32 {
    println!("🔍 Checking animal service at {}", config.source.base_url);

    let client = match AnimalApiClient::new(config, shutdown_signal) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Failed to create client: {e}");
            return 4; // Connection error exit code
        }
    };

    match client.health_check().await {
        Ok(()) => {
            println!("✅ Animal service is reachable");
            0
        }
        Err(e) => {
            println!("❌ Animal service is unreachable");
            println!("   Error: {e}");
            4
        }
    }
}
