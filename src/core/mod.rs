//! Core business logic for Fauna.
//!
//! This module contains the pipeline stages and their orchestration.
//!
//! # Modules
//!
//! - [`extract`] - Listing walk and detail fetch as a lazy stream
//! - [`transform`] - Pure mapping from raw to canonical records
//! - [`load`] - Batch formation and destination sends
//! - [`pipeline`] - Run orchestration, counters and summary
//!
//! # Run Workflow
//!
//! 1. **List**: Walk the listing from page 1 until an empty or final page
//! 2. **Fetch**: Fetch detail for every listed id, concurrently within a page
//! 3. **Transform**: Normalize friends and born_at, skipping broken records
//! 4. **Batch**: Group canonical records in arrival order
//! 5. **Load**: POST each full batch while the walk continues
//! 6. **Report**: Build and log the run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use fauna::config::load_config;
//! use fauna::core::pipeline::Pipeline;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("fauna.toml")?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let pipeline = Pipeline::new(&config, shutdown_rx)?;
//!
//! let summary = pipeline.run().await?;
//!
//! println!("Loaded: {}", summary.stats.records_loaded);
//! println!("Failed: {}", summary.stats.records_failed);
//! println!("Skipped: {}", summary.stats.records_skipped);
//! # Ok(())
//! # }
//! ```

pub mod extract;
pub mod load;
pub mod pipeline;
pub mod transform;
