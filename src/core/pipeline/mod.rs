//! Pipeline orchestration
//!
//! This module wires reader, transformer and loader together and reports
//! the outcome of a run.

pub mod coordinator;
pub mod state;
pub mod stats;
pub mod summary;

pub use coordinator::Pipeline;
pub use state::PipelineState;
pub use stats::{RunStats, RunStatsSnapshot};
pub use summary::{RunError, RunErrorType, RunOutcome, RunSummary};
