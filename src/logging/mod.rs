//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output
//! - JSON-formatted rolling log files
//! - Configurable log levels (overridable through `RUST_LOG`)
//!
//! # Example
//!
//! ```no_run
//! use fauna::logging::init_logging;
//! use fauna::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a failed attempt that will be retried
///
/// # Example
///
/// ```no_run
/// use fauna::log_retry_attempt;
/// use std::time::Duration;
///
/// log_retry_attempt!("GET", "http://localhost:3123/animals/v1/animals", 2, 5, Duration::from_secs(2), "Server error 503");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($method:expr, $url:expr, $attempt:expr, $max_attempts:expr, $delay:expr, $reason:expr) => {
        tracing::warn!(
            method = %$method,
            url = %$url,
            attempt = $attempt,
            max_attempts = $max_attempts,
            delay_ms = $delay.as_millis() as u64,
            reason = %$reason,
            "Request failed, retrying"
        );
    };
}

/// Log the outcome of one batch send
///
/// # Example
///
/// ```no_run
/// use fauna::log_batch_outcome;
/// use std::time::Duration;
///
/// log_batch_outcome!(3, 100, Duration::from_millis(250), "sent");
/// ```
#[macro_export]
macro_rules! log_batch_outcome {
    ($index:expr, $records:expr, $elapsed:expr, $outcome:expr) => {
        tracing::info!(
            batch = $index,
            records = $records,
            elapsed_ms = $elapsed.as_millis() as u64,
            outcome = $outcome,
            "Batch processed"
        );
    };
}
