//! Pipeline lifecycle states

use std::fmt;

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Constructed, not yet started
    Idle,
    /// Walking the listing, no record seen yet
    Fetching,
    /// Records are flowing through transform and load
    TransformingAndLoading,
    /// Run finished (successfully, with errors, interrupted or failed)
    Complete,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Idle => "idle",
            PipelineState::Fetching => "fetching",
            PipelineState::TransformingAndLoading => "transforming_and_loading",
            PipelineState::Complete => "complete",
        };
        f.write_str(name)
    }
}
