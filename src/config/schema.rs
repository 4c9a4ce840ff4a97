//! Configuration schema types
//!
//! This module defines the configuration structure for Fauna. Every section
//! has defaults, so an empty TOML document is a valid configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main Fauna configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaunaConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Animal service connection settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Retry and backoff policy for every HTTP call
    #[serde(default)]
    pub retry: RetryConfig,

    /// Batch loading settings
    #[serde(default)]
    pub load: LoadConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FaunaConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.retry.validate()?;
        self.load.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (don't POST batches to the destination)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Animal service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the animal service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Page size requested from the listing endpoint (service default if unset)
    #[serde(default)]
    pub per_page: Option<u32>,

    /// Total request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_seconds")]
    pub connect_timeout_seconds: u64,

    /// Maximum number of detail requests in flight
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("source.base_url cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("source.base_url must start with http:// or https://".to_string());
        }

        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!("source.base_url '{}' is not a valid URL", self.base_url));
        }

        if self.per_page == Some(0) {
            return Err("source.per_page must be > 0".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("source.timeout_seconds must be > 0".to_string());
        }

        if self.connect_timeout_seconds == 0 {
            return Err("source.connect_timeout_seconds must be > 0".to_string());
        }

        if self.detail_concurrency == 0 || self.detail_concurrency > 100 {
            return Err(format!(
                "source.detail_concurrency must be between 1 and 100, got {}",
                self.detail_concurrency
            ));
        }

        Ok(())
    }

    /// Total request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Connect timeout
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            per_page: None,
            timeout_seconds: default_timeout_seconds(),
            connect_timeout_seconds: default_connect_timeout_seconds(),
            detail_concurrency: default_detail_concurrency(),
        }
    }
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per logical request (including the first)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in seconds
    #[serde(default = "default_base_delay_secs")]
    pub base_delay_secs: f64,

    /// Upper bound for any single delay, in seconds
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: f64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,

    /// Scale each delay by a random factor in [0.5, 1.0]
    #[serde(default = "default_true")]
    pub jitter: bool,

    /// HTTP statuses that trigger a retry
    #[serde(default = "default_retry_statuses")]
    pub retry_statuses: Vec<u16>,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 || self.max_attempts > 20 {
            return Err(format!(
                "retry.max_attempts must be between 1 and 20, got {}",
                self.max_attempts
            ));
        }

        if !self.base_delay_secs.is_finite() || self.base_delay_secs < 0.0 {
            return Err(format!(
                "retry.base_delay_secs must be >= 0, got {}",
                self.base_delay_secs
            ));
        }

        if !self.max_delay_secs.is_finite() || self.max_delay_secs < self.base_delay_secs {
            return Err(format!(
                "retry.max_delay_secs must be >= retry.base_delay_secs, got {}",
                self.max_delay_secs
            ));
        }

        if self.max_delay_secs > MAX_RETRY_DELAY_SECS {
            return Err(format!(
                "retry.max_delay_secs must be <= {MAX_RETRY_DELAY_SECS}, got {}",
                self.max_delay_secs
            ));
        }

        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(format!(
                "retry.backoff_factor must be >= 1.0, got {}",
                self.backoff_factor
            ));
        }

        if let Some(status) = self
            .retry_statuses
            .iter()
            .find(|status| !(500..=599).contains(*status))
        {
            return Err(format!(
                "retry.retry_statuses may only contain 5xx statuses, got {status}"
            ));
        }

        Ok(())
    }

    /// Base delay as a Duration
    pub fn base_delay(&self) -> Duration {
        secs_to_duration(self.base_delay_secs)
    }

    /// Maximum delay as a Duration
    pub fn max_delay(&self) -> Duration {
        secs_to_duration(self.max_delay_secs)
    }
}

/// Saturating conversion for unvalidated values: negative or NaN is zero,
/// anything too large for a Duration is `Duration::MAX`
fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX)
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_secs: default_base_delay_secs(),
            max_delay_secs: default_max_delay_secs(),
            backoff_factor: default_backoff_factor(),
            jitter: true,
            retry_statuses: default_retry_statuses(),
        }
    }
}

/// Batch loading configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Records per destination POST (the home endpoint accepts at most 100)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum number of batch POSTs in flight
    #[serde(default = "default_load_concurrency")]
    pub load_concurrency: usize,

    /// Minimum fraction of records that must load for the run to count as a success
    #[serde(default = "default_min_success_ratio")]
    pub min_success_ratio: f64,
}

impl LoadConfig {
    fn validate(&self) -> Result<(), String> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(format!(
                "load.batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                self.batch_size
            ));
        }

        if self.load_concurrency == 0 || self.load_concurrency > 32 {
            return Err(format!(
                "load.load_concurrency must be between 1 and 32, got {}",
                self.load_concurrency
            ));
        }

        if !(0.0..=1.0).contains(&self.min_success_ratio) {
            return Err(format!(
                "load.min_success_ratio must be between 0.0 and 1.0, got {}",
                self.min_success_ratio
            ));
        }

        Ok(())
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            load_concurrency: default_load_concurrency(),
            min_success_ratio: default_min_success_ratio(),
        }
    }
}

/// Largest batch the destination endpoint accepts
pub const MAX_BATCH_SIZE: usize = 100;

/// Longest single retry delay accepted in configuration (one day)
pub const MAX_RETRY_DELAY_SECS: f64 = 86_400.0;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3123".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_connect_timeout_seconds() -> u64 {
    10
}

fn default_detail_concurrency() -> usize {
    10
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay_secs() -> f64 {
    1.0
}

fn default_max_delay_secs() -> f64 {
    120.0
}

fn default_backoff_factor() -> f64 {
    2.0
}

fn default_retry_statuses() -> Vec<u16> {
    vec![500, 502, 503, 504]
}

fn default_batch_size() -> usize {
    100
}

fn default_load_concurrency() -> usize {
    1
}

fn default_min_success_ratio() -> f64 {
    1.0
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
