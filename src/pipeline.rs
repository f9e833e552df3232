// THEORY:
// The `pipeline` module is the top-level API of the canvas engine. It runs the
// fixed normalization chain once per trigger, over a grid the caller owns:
//
//   find_bounding_box -> centroid -> recenter -> smooth -> normalize -> serialize
//
// Every stage reads one grid and returns a new one, so the drawing the user is
// still looking at is never touched. The chain is synchronous and does no I/O;
// handing the payload to a classifier is the caller's business.
//
// A blank canvas (no cell above the significance threshold) stops the chain
// right after the bounding box stage. The input grid comes back as the result
// and the centroid is never computed, since it would have no mass to work with.

use crate::core_modules::bounding_box::{BoundingBox, DEFAULT_THRESHOLD, find_bounding_box};
use crate::core_modules::brush::Brush;
use crate::core_modules::centroid::{self, Centroid};
use crate::core_modules::error::CanvasError;
use crate::core_modules::grid::grid::{Grid, Intensity};
use crate::core_modules::intensity;
use crate::core_modules::recenter::{self, ScalingPolicy};
use crate::core_modules::serializer::{self, Byte};
use crate::core_modules::smoother;
use tracing::debug;

// Re-export the configuration vocabulary for the public API.
pub use crate::core_modules::brush::FalloffPolicy;

/// Side length of an MNIST digit.
pub const MNIST_SIZE: usize = 28;

/// Configuration for the NormalizationPipeline and the drawing surface feeding it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Side length N of every grid.
    pub grid_size: usize,
    /// A cell must be strictly brighter than this to count as drawn content.
    pub threshold: Intensity,
    /// Whether oversized digits are shrunk before centering.
    pub scaling: ScalingPolicy,
    /// The brush used by a `DrawingSession` built from this config.
    pub brush: Brush,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            grid_size: MNIST_SIZE,
            threshold: DEFAULT_THRESHOLD,
            scaling: ScalingPolicy::default(),
            brush: Brush::default(),
        }
    }
}

impl PipelineConfig {
    /// Rejects settings that would make a later stage meaningless.
    pub fn validate(&self) -> Result<(), CanvasError> {
        if self.grid_size == 0 {
            return Err(CanvasError::invalid_config("grid_size must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.threshold) {
            return Err(CanvasError::invalid_config(format!(
                "threshold must lie in [0, 1), got {}",
                self.threshold
            )));
        }
        if let ScalingPolicy::Enabled { target_size: 0 } = self.scaling {
            return Err(CanvasError::invalid_config("scaling target_size must be at least 1"));
        }
        if self.brush.radius as usize > self.grid_size {
            return Err(CanvasError::invalid_config(format!(
                "brush radius {} exceeds grid size {}",
                self.brush.radius, self.grid_size
            )));
        }
        if !(self.brush.intensity > 0.0 && self.brush.intensity <= 1.0) {
            return Err(CanvasError::invalid_config(format!(
                "brush intensity must lie in (0, 1], got {}",
                self.brush.intensity
            )));
        }
        Ok(())
    }
}

/// The request body the classification endpoint expects: `{"image_data": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictionRequest {
    /// N * N bytes, row-major with the row as the outer dimension.
    pub image_data: Vec<Byte>,
}

/// The result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedDigit {
    /// The normalized grid, or the untouched input for a blank canvas.
    pub grid: Grid,
    /// Where the drawing was found on the input grid. `None` for a blank canvas.
    pub bounding_box: Option<BoundingBox>,
    /// The drawing's center of mass on the input grid. `None` for a blank canvas.
    pub centroid: Option<Centroid>,
}

impl ProcessedDigit {
    /// True when the input had no drawn content and the chain short-circuited.
    pub fn is_empty(&self) -> bool {
        self.bounding_box.is_none()
    }

    pub fn serialize(&self) -> Vec<Byte> {
        serializer::serialize(&self.grid)
    }

    pub fn payload(&self) -> PredictionRequest {
        PredictionRequest {
            image_data: self.serialize(),
        }
    }
}

/// The main, top-level struct for the normalization engine.
#[derive(Debug, Clone)]
pub struct NormalizationPipeline {
    config: PipelineConfig,
}

impl NormalizationPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self, CanvasError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the full chain over `grid` and returns the normalized digit.
    pub fn process(&self, grid: &Grid) -> Result<ProcessedDigit, CanvasError> {
        if grid.size() != self.config.grid_size {
            return Err(CanvasError::SizeMismatch {
                expected: self.config.grid_size,
                actual: grid.size(),
            });
        }

        // Stage 1: Locate the drawing
        let Some(bounding_box) = find_bounding_box(grid, self.config.threshold) else {
            debug!(threshold = self.config.threshold, "blank canvas, skipping normalization");
            return Ok(ProcessedDigit {
                grid: grid.clone(),
                bounding_box: None,
                centroid: None,
            });
        };
        debug!(
            min_col = bounding_box.min_col(),
            min_row = bounding_box.min_row(),
            width = bounding_box.width(),
            height = bounding_box.height(),
            "bounding box found"
        );

        // Stage 2: Center of mass (reported to the caller; recenter derives its own)
        let mass_center = centroid::centroid(grid, &bounding_box)?;
        debug!(x = mass_center.x, y = mass_center.y, "center of mass");

        // Stage 3: Recenter (and optionally rescale)
        let recentered = recenter::recenter(grid, Some(&bounding_box), self.config.scaling)?;
        debug!(scaling = ?self.config.scaling, "recentered");

        // Stage 4: Smooth
        let smoothed = smoother::smooth(&recentered);
        debug!(mass = smoothed.total_mass(), "smoothed");

        // Stage 5: Normalize intensity
        let normalized = intensity::normalize(&smoothed);
        debug!(peak = normalized.max_value(), "intensity normalized");

        Ok(ProcessedDigit {
            grid: normalized,
            bounding_box: Some(bounding_box),
            centroid: Some(mass_center),
        })
    }

    /// Convenience for `process(grid)?.payload()`.
    pub fn prepare_request(&self, grid: &Grid) -> Result<PredictionRequest, CanvasError> {
        Ok(self.process(grid)?.payload())
    }
}
