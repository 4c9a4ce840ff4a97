//! Batch loader
//!
//! Sends batches to the destination endpoint. Each batch is sent
//! independently: a failed batch is reported and the next one proceeds.

use super::batch::Batch;
use super::report::{BatchOutcome, BatchStatus};
use crate::adapters::animals::AnimalApiClient;
use crate::config::LoadConfig;
use crate::log_batch_outcome;
use std::sync::Arc;
use std::time::Instant;

/// Sends batches of canonical records to the destination
pub struct BatchLoader {
    client: Arc<AnimalApiClient>,
    batch_size: usize,
    concurrency: usize,
    dry_run: bool,
}

impl BatchLoader {
    /// Create a loader from the `[load]` configuration section
    pub fn new(client: Arc<AnimalApiClient>, config: &LoadConfig, dry_run: bool) -> Self {
        Self {
            client,
            batch_size: config.batch_size.max(1),
            concurrency: config.load_concurrency.max(1),
            dry_run,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Send one batch and report what happened
    ///
    /// Never fails: transport errors are captured in the outcome.
    pub async fn send_batch(&self, batch: Batch) -> BatchOutcome {
        let started = Instant::now();
        let record_ids = batch.record_ids();
        let record_count = batch.len();

        let status = if self.dry_run {
            tracing::debug!(
                batch = batch.index,
                records = record_count,
                "Dry run: skipping destination request"
            );
            BatchStatus::DryRun
        } else {
            match self.client.load_animals(&batch.records).await {
                Ok(_) => BatchStatus::Sent,
                Err(e) => {
                    tracing::error!(
                        batch = batch.index,
                        records = record_count,
                        record_ids = ?record_ids,
                        error = %e,
                        "Batch failed"
                    );
                    BatchStatus::Failed {
                        error: e.to_string(),
                    }
                }
            }
        };

        let elapsed = started.elapsed();
        log_batch_outcome!(batch.index, record_count, elapsed, status.label());

        BatchOutcome {
            index: batch.index,
            record_count,
            record_ids,
            status,
            elapsed,
        }
    }
}
