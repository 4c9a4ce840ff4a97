//! Pipeline coordinator - main orchestrator for a run
//!
//! Pulls items from the [`SourceReader`], transforms each record as it
//! arrives, groups the results into batches and hands full batches to the
//! [`BatchLoader`] while the walk continues.

use super::state::PipelineState;
use super::stats::RunStats;
use super::summary::{RunError, RunErrorType, RunSummary};
use crate::adapters::animals::AnimalApiClient;
use crate::config::FaunaConfig;
use crate::core::extract::{SourceItem, SourceReader};
use crate::core::load::{BatchAccumulator, BatchLoader, BatchOutcome, BatchStatus, LoadReport};
use crate::core::transform::{transform_record, validate_transformation};
use crate::domain::{CanonicalRecord, FaunaError, PipelineError, RawRecord, Result};
use chrono::Utc;
use futures::stream::{FuturesOrdered, StreamExt};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::watch;

/// Pipeline coordinator
pub struct Pipeline {
    reader: SourceReader,
    loader: BatchLoader,
    min_success_ratio: f64,
    state: Mutex<PipelineState>,
    shutdown: watch::Receiver<bool>,
}

/// Everything accumulated while a run is in progress
struct RunLedger {
    stats: RunStats,
    report: LoadReport,
    errors: Vec<RunError>,
}

impl RunLedger {
    fn new() -> Self {
        Self {
            stats: RunStats::new(),
            report: LoadReport::new(),
            errors: Vec::new(),
        }
    }

    fn record_batch(&mut self, outcome: BatchOutcome) {
        match &outcome.status {
            BatchStatus::Sent => self.stats.record_batch_sent(outcome.record_count),
            BatchStatus::Failed { error } => {
                self.stats.record_batch_failed(outcome.record_count);
                let ids: Vec<String> = outcome.record_ids.iter().map(ToString::to_string).collect();
                self.errors.push(
                    RunError::new(RunErrorType::BatchLoad, error.clone()).with_context(format!(
                        "batch={}, animal_ids=[{}]",
                        outcome.index,
                        ids.join(",")
                    )),
                );
            }
            BatchStatus::DryRun => {}
        }
        self.report.add(outcome);
    }

    fn record_skip(&mut self, error: RunError) {
        self.stats.record_skipped();
        self.errors.push(error);
    }
}

impl Pipeline {
    /// Create a pipeline talking to the configured animal service
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: &FaunaConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        let client = Arc::new(AnimalApiClient::new(config, shutdown.clone())?);
        Ok(Self::with_client(client, config, shutdown))
    }

    /// Create a pipeline around an existing client
    pub fn with_client(
        client: Arc<AnimalApiClient>,
        config: &FaunaConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            reader: SourceReader::new(Arc::clone(&client), config.source.detail_concurrency),
            loader: BatchLoader::new(client, &config.load, config.application.dry_run),
            min_success_ratio: config.load.min_success_ratio,
            state: Mutex::new(PipelineState::Idle),
            shutdown,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> PipelineState {
        match self.state.lock() {
            Ok(state) => *state,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Threshold used to classify the outcome of a run
    pub fn min_success_ratio(&self) -> f64 {
        self.min_success_ratio
    }

    fn transition(&self, next: PipelineState) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let previous = *state;
        if previous != next {
            tracing::info!(from = %previous, to = %next, "Pipeline state changed");
            *state = next;
        }
    }

    fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Execute one full run
    ///
    /// Detail and transform failures are skipped and counted; failed
    /// batches are counted and the run continues. Both appear in the
    /// summary's error list.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ListingFailed`] if a listing page cannot be
    /// fetched. In-flight batch sends are completed and the partial stats
    /// are logged before the error is returned.
    pub async fn run(&self) -> Result<RunSummary> {
        let started_at = Utc::now();
        let timer = Instant::now();
        let mut ledger = RunLedger::new();

        tracing::info!(
            batch_size = self.loader.batch_size(),
            load_concurrency = self.loader.concurrency(),
            dry_run = self.loader.is_dry_run(),
            "Starting pipeline run"
        );
        self.transition(PipelineState::Fetching);

        let mut items = self.reader.stream();
        let mut batches = BatchAccumulator::new(self.loader.batch_size());
        let mut in_flight = FuturesOrdered::new();
        let mut shutdown = self.shutdown.clone();
        let mut interrupted = false;
        let mut fatal: Option<FaunaError> = None;

        loop {
            tokio::select! {
                Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                    ledger.record_batch(outcome);
                }
                Ok(_) = shutdown.wait_for(|stop| *stop) => {
                    interrupted = true;
                    break;
                }
                item = items.next() => {
                    let Some(item) = item else { break };
                    if self.is_shutdown() {
                        interrupted = true;
                        break;
                    }

                    match item {
                        Ok(SourceItem::Page { page, count }) => {
                            tracing::debug!(page = page, count = count, "Listing page queued");
                            ledger.stats.add_listed(count);
                        }
                        Ok(SourceItem::Record(raw)) => {
                            ledger.stats.record_detail_fetched();
                            self.transition(PipelineState::TransformingAndLoading);
                            if let Some(batch) = self
                                .transform(&raw, &mut ledger)
                                .and_then(|record| batches.push(record))
                            {
                                while in_flight.len() >= self.loader.concurrency() {
                                    if let Some(outcome) = in_flight.next().await {
                                        ledger.record_batch(outcome);
                                    }
                                }
                                in_flight.push_back(self.loader.send_batch(batch));
                            }
                        }
                        Ok(SourceItem::Skipped { id, reason }) => {
                            ledger.record_skip(
                                RunError::new(RunErrorType::DetailFetch, reason)
                                    .with_context(format!("animal_id={id}")),
                            );
                        }
                        Err(err) => {
                            if self.is_shutdown() || is_cancelled_listing(&err) {
                                interrupted = true;
                            } else {
                                ledger.errors.push(RunError::new(RunErrorType::Listing, err.to_string()));
                                fatal = Some(err);
                            }
                            break;
                        }
                    }
                }
            }
        }

        if interrupted || fatal.is_some() {
            if batches.pending_len() > 0 {
                tracing::warn!(
                    records = batches.pending_len(),
                    "Dropping partial batch, run did not complete"
                );
            }
        } else if let Some(batch) = batches.finish() {
            in_flight.push_back(self.loader.send_batch(batch));
        }

        while let Some(outcome) = in_flight.next().await {
            ledger.record_batch(outcome);
        }

        self.transition(PipelineState::Complete);

        let summary = RunSummary {
            stats: ledger.stats.snapshot(),
            load_report: ledger.report,
            errors: ledger.errors,
            started_at,
            finished_at: Utc::now(),
            duration: timer.elapsed(),
            interrupted,
            dry_run: self.loader.is_dry_run(),
        };

        if let Some(err) = fatal {
            tracing::error!(
                error = %err,
                listed = summary.stats.listed,
                records_loaded = summary.stats.records_loaded,
                records_failed = summary.stats.records_failed,
                records_skipped = summary.stats.records_skipped,
                "Pipeline aborted"
            );
            return Err(err);
        }

        if interrupted {
            tracing::warn!("Pipeline interrupted by shutdown signal");
        }
        summary.log_summary();

        Ok(summary)
    }

    fn transform(&self, raw: &RawRecord, ledger: &mut RunLedger) -> Option<CanonicalRecord> {
        match transform_record(raw) {
            Ok(record) => {
                debug_assert!(
                    validate_transformation(raw, &record).is_ok(),
                    "transformed record does not match its source"
                );
                ledger.stats.record_transformed();
                Some(record)
            }
            Err(e) => {
                let context = raw
                    .id
                    .map(|id| format!("animal_id={id}"))
                    .unwrap_or_else(|| "animal_id=unknown".to_string());
                tracing::warn!(error = %e, context = %context, "Skipping record, transform failed");
                ledger.record_skip(
                    RunError::new(RunErrorType::Transformation, e.to_string()).with_context(context),
                );
                None
            }
        }
    }
}

fn is_cancelled_listing(err: &FaunaError) -> bool {
    matches!(
        err,
        FaunaError::Pipeline(PipelineError::ListingFailed { source, .. }) if source.is_cancelled()
    )
}
