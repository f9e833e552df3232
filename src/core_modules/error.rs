// THEORY:
// The canvas engine has exactly three ways to fail. Everything else in the chain
// is a total function over a well-formed grid.
//
// 1.  **No mass**: a centroid was requested over a region whose total intensity
//     is zero. The pipeline never does this (it checks for an empty bounding box
//     first), so seeing this error means a caller skipped that check.
// 2.  **Size mismatch**: a grid of one size was handed to a pipeline configured
//     for another. Grids never change size, so this is always a caller bug.
// 3.  **Invalid configuration**: a knob was set to a value that would make a
//     later stage meaningless (a zero-sized grid, a threshold of 1.0 that no cell
//     can exceed, a brush wider than the grid). These are rejected up front.

use std::borrow::Cow;

/// Errors produced by the normalization engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CanvasError {
    /// The region handed to the centroid computation carries no intensity.
    #[error("cannot compute a centroid over a region with zero mass")]
    NoMass,

    /// The grid's side length differs from the configured one.
    #[error("grid is {actual}x{actual}, pipeline expects {expected}x{expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A configuration value is outside the range the pipeline can work with.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: Cow<'static, str> },
}

impl CanvasError {
    pub(crate) fn invalid_config(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidConfig { reason: reason.into() }
    }
}
