//! Configuration management for Fauna.
//!
//! Fauna reads an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FAUNA_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation before anything is sent upstream
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! base_url = "http://localhost:3123"
//! detail_concurrency = 10
//!
//! [retry]
//! max_attempts = 5
//! base_delay_secs = 1.0
//! max_delay_secs = 120.0
//! backoff_factor = 2.0
//!
//! [load]
//! batch_size = 100
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fauna::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fauna.toml")?;
//! println!("Animal service: {}", config.source.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, FaunaConfig, LoadConfig, LoggingConfig, RetryConfig, SourceConfig,
    MAX_BATCH_SIZE, MAX_RETRY_DELAY_SECS,
};
