//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::config::FaunaConfig;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "fauna.toml")]
    pub output: String,

    /// Include comments explaining every setting
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Fauna configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()?
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Or set FAUNA_<SECTION>_<KEY> variables in a .env file");
                println!("  3. Validate configuration: fauna validate-config");
                println!("  4. Check the service: fauna health");
                println!("  5. Run the pipeline: fauna run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate the default configuration
    fn generate_minimal_config() -> anyhow::Result<String> {
        let body = toml::to_string_pretty(&FaunaConfig::default())?;
        Ok(format!(
            "# Fauna Configuration File\n# Resilient ETL for the animal service\n\n{body}"
        ))
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Fauna Configuration File
# Resilient ETL for the animal service
#
# Every setting is optional. Values may reference environment variables
# with ${VAR_NAME}, and FAUNA_<SECTION>_<KEY> variables override the file.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode (form batches but don't POST them)
dry_run = false

# ============================================================================
# Animal Service
# ============================================================================
[source]
# Base URL of the animal service
base_url = "http://localhost:3123"

# Page size requested from the listing endpoint (service default if unset)
# per_page = 50

# Total request timeout in seconds
timeout_seconds = 30

# Connect timeout in seconds
connect_timeout_seconds = 10

# Detail requests in flight at once (1-100)
detail_concurrency = 10

# ============================================================================
# Retry Policy
# ============================================================================
[retry]
# Attempts per request, including the first (1-20)
max_attempts = 5

# Delay before the first retry, in seconds
base_delay_secs = 1.0

# Upper bound for any single delay, in seconds
max_delay_secs = 120.0

# Delay multiplier per failed attempt
backoff_factor = 2.0

# Scale each delay by a random factor in [0.5, 1.0]
jitter = true

# Statuses that are retried (5xx only)
retry_statuses = [500, 502, 503, 504]

# ============================================================================
# Loading
# ============================================================================
[load]
# Records per destination request (1-100)
batch_size = 100

# Batch requests in flight at once (1-32)
load_concurrency = 1

# Fraction of records that must load for exit code 0 (0.0-1.0)
min_success_ratio = 1.0

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging
local_enabled = false

# Log directory
local_path = "logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"
"#
        .to_string()
    }
}
