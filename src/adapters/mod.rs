//! External system integrations for Fauna.
//!
//! - [`animals`] - the animal service, which is both the source of records
//!   and the destination of loaded batches
//!
//! # Design Pattern
//!
//! Adapters isolate the HTTP client from the pipeline. Nothing outside this
//! module touches `reqwest`; errors surface as [`crate::domain::TransportError`].
//!
//! ```rust,no_run
//! use fauna::adapters::animals::AnimalApiClient;
//! use fauna::config::FaunaConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let client = AnimalApiClient::new(&FaunaConfig::default(), shutdown_rx)?;
//! let page = client.list_animals(1).await?;
//! println!("{} animals on page 1", page.items.len());
//! # Ok(())
//! # }
//! ```

pub mod animals;
