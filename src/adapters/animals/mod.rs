//! Animal service integration
//!
//! - [`transport`] - retrying HTTP transport with exponential backoff
//! - [`client`] - typed calls for the listing, detail and home endpoints
//! - [`models`] - listing page wire types

pub mod client;
pub mod models;
pub mod transport;

pub use client::AnimalApiClient;
pub use models::{AnimalPage, AnimalSummary};
pub use transport::{ResilientTransport, RetryPolicy};
