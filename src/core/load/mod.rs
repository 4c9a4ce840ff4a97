//! Batch loading to the destination endpoint

pub mod batch;
pub mod loader;
pub mod report;

pub use batch::{partition, Batch, BatchAccumulator};
pub use loader::BatchLoader;
pub use report::{BatchOutcome, BatchStatus, LoadReport};
