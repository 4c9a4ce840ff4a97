// Fauna - Resilient ETL for the animal service
// Copyright (c) 2025 Fauna Contributors
// Licensed under the MIT License

//! # Fauna - Resilient ETL for the animal service
//!
//! Fauna extracts animals from a paginated HTTP service that randomly stalls
//! or fails, normalizes each record, and loads the results back in batches.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Extracting** every animal by walking the listing and fetching detail
//! - **Transforming** friends and birth timestamps into a canonical shape
//! - **Loading** canonical records to the destination in batches of up to 100
//! - **Retrying** every request with capped exponential backoff
//!
//! ## Architecture
//!
//! Fauna follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (extract, transform, load, pipeline)
//! - [`adapters`] - External integrations (the animal service)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fauna::config::FaunaConfig;
//! use fauna::core::pipeline::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = FaunaConfig::default();
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//!     let pipeline = Pipeline::new(&config, shutdown_rx)?;
//!     let summary = pipeline.run().await?;
//!
//!     println!("Loaded {} animals", summary.stats.records_loaded);
//!     Ok(())
//! }
//! ```
//!
//! ## Data Transformation
//!
//! ```rust
//! use fauna::core::transform::transform_record;
//! use fauna::domain::RawRecord;
//!
//! let raw: RawRecord = serde_json::from_str(
//!     r#"{"id": 4, "name": "Hare", "friends": "Fox, ,Owl", "born_at": "2020-02-29"}"#,
//! ).unwrap();
//!
//! let record = transform_record(&raw).unwrap();
//! assert_eq!(record.friends, vec!["Fox", "Owl"]);
//! assert_eq!(record.born_at.as_deref(), Some("2020-02-29T00:00:00.000Z"));
//! ```
//!
//! ## Error Handling
//!
//! Fauna uses the [`domain::FaunaError`] type for all errors that propagate.
//! Record and batch failures are recovered and reported in the run summary.
//!
//! ```rust,no_run
//! use fauna::domain::FaunaError;
//!
//! fn example() -> Result<(), FaunaError> {
//!     let _config = fauna::config::load_config("fauna.toml")?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
