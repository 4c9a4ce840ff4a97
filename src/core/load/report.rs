//! Per-batch outcomes and the load report

use crate::domain::AnimalId;
use std::time::Duration;

/// What happened to one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    /// The destination accepted the batch
    Sent,
    /// The batch failed after all retries
    Failed {
        /// Final error message
        error: String,
    },
    /// Dry run: the batch was formed but not sent
    DryRun,
}

impl BatchStatus {
    /// Short label used in logs
    pub fn label(&self) -> &'static str {
        match self {
            BatchStatus::Sent => "sent",
            BatchStatus::Failed { .. } => "failed",
            BatchStatus::DryRun => "dry_run",
        }
    }
}

/// Outcome of one batch send
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub index: usize,
    pub record_count: usize,
    pub record_ids: Vec<AnimalId>,
    pub status: BatchStatus,
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub fn is_sent(&self) -> bool {
        self.status == BatchStatus::Sent
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, BatchStatus::Failed { .. })
    }

    pub fn is_dry_run(&self) -> bool {
        self.status == BatchStatus::DryRun
    }
}

/// Outcomes of every batch in a run, in batch order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub outcomes: Vec<BatchOutcome>,
}

impl LoadReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one batch outcome
    pub fn add(&mut self, outcome: BatchOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn total_batches(&self) -> usize {
        self.outcomes.len()
    }

    pub fn batches_sent(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_sent()).count()
    }

    pub fn batches_failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn records_loaded(&self) -> usize {
        self.count_records(BatchOutcome::is_sent)
    }

    pub fn records_failed(&self) -> usize {
        self.count_records(BatchOutcome::is_failed)
    }

    pub fn records_dry_run(&self) -> usize {
        self.count_records(BatchOutcome::is_dry_run)
    }

    /// Identifiers of every record in a failed batch
    pub fn failed_ids(&self) -> Vec<AnimalId> {
        self.outcomes
            .iter()
            .filter(|o| o.is_failed())
            .flat_map(|o| o.record_ids.iter().copied())
            .collect()
    }

    fn count_records(&self, predicate: impl Fn(&BatchOutcome) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|o| predicate(o))
            .map(|o| o.record_count)
            .sum()
    }
}
