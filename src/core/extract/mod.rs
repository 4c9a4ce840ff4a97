//! Extraction from the paginated animal service

pub mod reader;

pub use reader::{SourceItem, SourceReader};
