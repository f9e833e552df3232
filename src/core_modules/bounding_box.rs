// THEORY:
// The bounding box finder is the first stage of the normalization chain. It
// answers a single question: where on the grid is the drawing?
//
// A cell "counts" as drawn content when its intensity is strictly above a
// significance threshold (0.1 by default). Faint brush fringe below that level
// is ignored, so a stray low-intensity halo does not stretch the box.
//
// The result is either the tightest axis-aligned rectangle around every
// counting cell, or `None` for a blank canvas. `None` is not an error: the
// pipeline treats it as the signal to stop and hand back the untouched grid.

use crate::core_modules::grid::grid::{Grid, Intensity};

/// Default significance threshold for a cell to count as drawn content.
pub const DEFAULT_THRESHOLD: Intensity = 0.1;

/// The tightest rectangle around all above-threshold cells, inclusive on both ends.
/// Only `find_bounding_box` builds these, so a box is never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    min_col: usize,
    min_row: usize,
    max_col: usize,
    max_row: usize,
}

impl BoundingBox {
    pub fn min_col(&self) -> usize {
        self.min_col
    }

    pub fn min_row(&self) -> usize {
        self.min_row
    }

    pub fn max_col(&self) -> usize {
        self.max_col
    }

    pub fn max_row(&self) -> usize {
        self.max_row
    }

    pub fn width(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    pub fn contains(&self, col: f64, row: f64) -> bool {
        col >= self.min_col as f64
            && col <= self.max_col as f64
            && row >= self.min_row as f64
            && row <= self.max_row as f64
    }

    /// Every `(col, row)` inside the box, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.min_row..=self.max_row)
            .flat_map(move |row| (self.min_col..=self.max_col).map(move |col| (col, row)))
    }
}

/// Scans the whole grid and returns the box around every cell whose value
/// exceeds `threshold`, or `None` when no cell does.
pub fn find_bounding_box(grid: &Grid, threshold: Intensity) -> Option<BoundingBox> {
    let size = grid.size();
    let mut min_col = usize::MAX;
    let mut min_row = usize::MAX;
    let mut max_col = 0;
    let mut max_row = 0;
    let mut found = false;

    for row in 0..size {
        for col in 0..size {
            if grid.at(col, row) > threshold {
                found = true;
                min_col = min_col.min(col);
                min_row = min_row.min(row);
                max_col = max_col.max(col);
                max_row = max_row.max(row);
            }
        }
    }

    found.then_some(BoundingBox {
        min_col,
        min_row,
        max_col,
        max_row,
    })
}
