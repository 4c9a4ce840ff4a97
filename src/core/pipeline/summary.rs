//! Run summary and reporting
//!
//! This module defines structures for tracking and reporting run results.

use super::stats::RunStatsSnapshot;
use crate::core::load::LoadReport;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Enough records were delivered
    Success,
    /// The run finished but too many records were skipped or failed
    CompletedWithErrors,
    /// The shutdown signal stopped the run early
    Interrupted,
}

/// Summary of a pipeline run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Final counters
    pub stats: RunStatsSnapshot,

    /// Per-batch outcomes
    pub load_report: LoadReport,

    /// Recovered errors, in the order they happened
    pub errors: Vec<RunError>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub duration: Duration,

    /// The run stopped on the shutdown signal
    pub interrupted: bool,

    /// Batches were formed but not sent
    pub dry_run: bool,
}

impl RunSummary {
    /// Create an empty summary for a run starting now
    pub fn new(dry_run: bool) -> Self {
        let now = Utc::now();
        Self {
            stats: RunStatsSnapshot::default(),
            load_report: LoadReport::new(),
            errors: Vec::new(),
            started_at: now,
            finished_at: now,
            duration: Duration::from_secs(0),
            interrupted: false,
            dry_run,
        }
    }

    /// Records that reached the destination, or would have in a dry run
    pub fn records_delivered(&self) -> usize {
        if self.dry_run {
            self.load_report.records_dry_run()
        } else {
            self.stats.records_loaded
        }
    }

    /// Fraction of considered records that were delivered
    ///
    /// Considered records are the delivered ones plus every skipped or
    /// failed record. A run that saw nothing has a ratio of 1.0.
    pub fn success_ratio(&self) -> f64 {
        let delivered = self.records_delivered();
        let considered = delivered + self.stats.records_failed + self.stats.records_skipped;
        if considered == 0 {
            return 1.0;
        }
        delivered as f64 / considered as f64
    }

    /// Classify the run against the configured threshold
    pub fn outcome(&self, min_success_ratio: f64) -> RunOutcome {
        if self.interrupted {
            RunOutcome::Interrupted
        } else if self.success_ratio() >= min_success_ratio {
            RunOutcome::Success
        } else {
            RunOutcome::CompletedWithErrors
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            listed = self.stats.listed,
            detail_fetched = self.stats.detail_fetched,
            transformed = self.stats.transformed,
            batches_sent = self.stats.batches_sent,
            batches_failed = self.stats.batches_failed,
            records_loaded = self.stats.records_loaded,
            records_failed = self.stats.records_failed,
            records_skipped = self.stats.records_skipped,
            duration_ms = self.duration.as_millis() as u64,
            success_ratio = format!("{:.2}%", self.success_ratio() * 100.0),
            interrupted = self.interrupted,
            dry_run = self.dry_run,
            "Run completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(error_count = self.errors.len(), "Run completed with errors");
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = ?error.context,
                    "Run error"
                );
            }
        }
    }
}

/// Type of recovered run error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunErrorType {
    /// Detail could not be fetched or decoded
    DetailFetch,
    /// Record failed transformation
    Transformation,
    /// Batch failed to load
    BatchLoad,
    /// Listing walk failed (recorded before the run aborts)
    Listing,
}

/// Run error with context
#[derive(Debug, Clone, PartialEq)]
pub struct RunError {
    pub error_type: RunErrorType,
    pub message: String,
    /// e.g. `animal_id=7` or `batch=3`
    pub context: Option<String>,
}

impl RunError {
    pub fn new(error_type: RunErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
