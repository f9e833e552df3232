// THEORY:
// This file is the main entry point for the `digit_canvas` library crate.
// It exposes two layers to external consumers (a drawing front-end, a tester,
// a network client):
//
// - `session`: the live, explicitly owned drawing surface that pointer input is
//   stamped into.
// - `pipeline`: the single-trigger normalization chain that turns a snapshot of
//   that surface into a classifier-ready payload.
//
// The individual transforms live in `core_modules` and are public so that each
// stage can be exercised on its own, but the intended interface is the
// `NormalizationPipeline` and the `DrawingSession`.

pub mod core_modules;
pub mod pipeline;
pub mod session;

pub use core_modules::error::CanvasError;
pub use core_modules::grid::grid::Grid;
pub use pipeline::{NormalizationPipeline, PipelineConfig, PredictionRequest, ProcessedDigit};
pub use session::DrawingSession;
