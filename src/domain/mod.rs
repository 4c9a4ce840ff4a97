//! Domain models and types for Fauna.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`AnimalId`])
//! - **Record models** ([`RawRecord`], [`CanonicalRecord`])
//! - **Error types** ([`FaunaError`], [`TransportError`], [`PipelineError`], [`TransformError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, FaunaError>`]:
//!
//! ```rust
//! use fauna::domain::{FaunaError, Result};
//!
//! fn example() -> Result<()> {
//!     let _config = fauna::config::load_config("fauna.toml")?;
//!     Ok(())
//! }
//! ```

pub mod animal;
pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use animal::{CanonicalRecord, CanonicalRecordBuilder, FriendsField, RawRecord};
pub use errors::{FaunaError, PipelineError, TransformError, TransportError};
pub use ids::AnimalId;
pub use result::Result;
