// THEORY:
// A `DrawingSession` is the explicitly owned drawing state. There is no
// process-wide canvas: whoever holds the session holds the one live grid, and
// every write goes through it.
//
// Two views of the drawing are kept apart on purpose:
// - the live grid, written by `stamp` while the user draws and read in place by
//   a rendering collaborator through `current()`;
// - a snapshot, an owned copy taken when the user asks for a prediction.
//
// `process()` always works on a snapshot, so strokes that keep arriving while
// a payload is in flight can never corrupt it. The live grid has exactly one
// writer at a time by construction (`&mut self`), so no locking is needed.

use crate::core_modules::brush::Brush;
use crate::core_modules::error::CanvasError;
use crate::core_modules::grid::grid::{Coordinate, Grid};
use crate::pipeline::{NormalizationPipeline, PipelineConfig, ProcessedDigit};

/// The live drawing surface plus the pipeline that normalizes its snapshots.
#[derive(Debug, Clone)]
pub struct DrawingSession {
    grid: Grid,
    brush: Brush,
    pipeline: NormalizationPipeline,
}

impl DrawingSession {
    pub fn new(config: PipelineConfig) -> Result<Self, CanvasError> {
        let grid = Grid::new(config.grid_size);
        let brush = config.brush;
        let pipeline = NormalizationPipeline::new(config)?;
        Ok(Self {
            grid,
            brush,
            pipeline,
        })
    }

    /// Stamps the configured brush at a grid cell. Any coordinates are accepted.
    pub fn stamp(&mut self, col: Coordinate, row: Coordinate) {
        self.brush.stamp(&mut self.grid, col, row);
    }

    /// Replaces the live grid with a blank one.
    pub fn clear(&mut self) {
        self.grid = self.grid.cleared();
    }

    /// The live grid, for a renderer to poll.
    pub fn current(&self) -> &Grid {
        &self.grid
    }

    /// An owned copy of the live grid.
    pub fn snapshot(&self) -> Grid {
        self.grid.clone()
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Swaps the brush for subsequent stamps. Existing strokes are kept.
    pub fn set_brush(&mut self, brush: Brush) -> Result<(), CanvasError> {
        PipelineConfig {
            brush,
            ..self.pipeline.config().clone()
        }
        .validate()?;
        self.brush = brush;
        Ok(())
    }

    pub fn pipeline(&self) -> &NormalizationPipeline {
        &self.pipeline
    }

    /// Normalizes a snapshot of the current drawing.
    pub fn process(&self) -> Result<ProcessedDigit, CanvasError> {
        let snapshot = self.snapshot();
        self.pipeline.process(&snapshot)
    }
}
