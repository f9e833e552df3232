// THEORY:
// The recenter stage moves the drawing so that its center of mass sits on the
// geometric center of the grid, `((N - 1) / 2, (N - 1) / 2)`. The reference
// corpus was built that way, so a classifier trained on it expects digits there.
//
// Two behaviors are in use and they produce materially different images, so the
// choice is exposed as `ScalingPolicy` instead of being settled here:
//
// 1.  **Disabled (crop and translate)**: The box is cut out into its own patch,
//     the patch's centroid is computed, and every patch cell is shifted by a
//     whole-cell offset. Nothing is resampled. Cells outside the box (faint
//     fringe below the threshold) are left behind, and anything pushed past the
//     grid edge is dropped.
// 2.  **Enabled (scale to fit and center)**: Digits wider or taller than the
//     target size (20 cells for MNIST) are shrunk uniformly. Every nonzero cell
//     of the full grid is forward-mapped to `round(coord * scale + offset)`.
//     Downscaling makes several sources land on one destination; the
//     destination keeps the maximum of them. Summing would saturate thin
//     strokes into blobs, and last-write-wins would let a faint cell erase a
//     dark one.
//
// Rounding is half-up (`floor(x + 0.5)`) on both paths, so a block whose
// centroid sits exactly between two cells always moves toward the larger index.

use crate::core_modules::bounding_box::BoundingBox;
use crate::core_modules::centroid::{self, Centroid};
use crate::core_modules::error::CanvasError;
use crate::core_modules::grid::grid::{Grid, Intensity};

/// Largest side, in cells, a digit keeps after scaling (MNIST convention).
pub const DEFAULT_TARGET_SIZE: usize = 20;

/// How the recenter stage treats the drawing's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum ScalingPolicy {
    /// Crop to the box and translate by whole cells.
    Disabled,
    /// Shrink anything larger than `target_size` cells, then center by mass.
    Enabled { target_size: usize },
}

impl Default for ScalingPolicy {
    fn default() -> Self {
        ScalingPolicy::Enabled {
            target_size: DEFAULT_TARGET_SIZE,
        }
    }
}

/// Recenters `grid` around the content in `bbox` according to `policy`.
///
/// A missing box means a blank canvas; the grid is returned as-is.
pub fn recenter(
    grid: &Grid,
    bbox: Option<&BoundingBox>,
    policy: ScalingPolicy,
) -> Result<Grid, CanvasError> {
    let Some(bbox) = bbox else {
        return Ok(grid.clone());
    };

    match policy {
        ScalingPolicy::Disabled => crop_and_translate(grid, bbox),
        ScalingPolicy::Enabled { target_size } => scale_to_fit(grid, bbox, target_size),
    }
}

/// A rectangular copy of part of a grid, indexed from its own origin.
struct Patch {
    width: usize,
    height: usize,
    cells: Vec<Intensity>,
}

impl Patch {
    fn crop(grid: &Grid, bbox: &BoundingBox) -> Self {
        let cells = bbox
            .cells()
            .map(|(col, row)| grid.get(col as i32, row as i32))
            .collect();
        Self {
            width: bbox.width(),
            height: bbox.height(),
            cells,
        }
    }

    fn at(&self, col: usize, row: usize) -> Intensity {
        self.cells[row * self.width + col]
    }

    fn centroid(&self) -> Result<Centroid, CanvasError> {
        centroid::weighted_centroid((0..self.height).flat_map(|row| {
            (0..self.width).map(move |col| (col as f64, row as f64, self.at(col, row)))
        }))
    }
}

fn crop_and_translate(grid: &Grid, bbox: &BoundingBox) -> Result<Grid, CanvasError> {
    let patch = Patch::crop(grid, bbox);
    let mass_center = patch.centroid()?;
    let center = grid.center();
    let offset_col = round_half_up(center - mass_center.x);
    let offset_row = round_half_up(center - mass_center.y);

    let mut recentered = grid.cleared();
    for row in 0..patch.height {
        for col in 0..patch.width {
            let value = patch.at(col, row);
            if value == 0.0 {
                continue;
            }
            // Out-of-range destinations are dropped by `set`.
            recentered.set(
                (col as i64 + offset_col) as i32,
                (row as i64 + offset_row) as i32,
                value,
            );
        }
    }
    Ok(recentered)
}

fn scale_to_fit(grid: &Grid, bbox: &BoundingBox, target_size: usize) -> Result<Grid, CanvasError> {
    let mass_center = centroid::local_centroid(grid, bbox)?;
    let max_dimension = bbox.width().max(bbox.height());
    let target = target_size.min(max_dimension);
    let scale = if max_dimension > target {
        target as f64 / max_dimension as f64
    } else {
        1.0
    };

    // Sources are mapped in box-local coordinates, so the result depends on the
    // shape alone and not on where it sits on the grid.
    let center = grid.center();
    let offset_x = center - mass_center.x * scale;
    let offset_y = center - mass_center.y * scale;
    let (origin_col, origin_row) = (bbox.min_col() as f64, bbox.min_row() as f64);
    let size = grid.size() as i64;

    let mut recentered = grid.cleared();
    for row in 0..grid.size() {
        for col in 0..grid.size() {
            let value = grid.at(col, row);
            if value <= 0.0 {
                continue;
            }
            let dest_col = round_half_up((col as f64 - origin_col) * scale + offset_x);
            let dest_row = round_half_up((row as f64 - origin_row) * scale + offset_y);
            if dest_col < 0 || dest_col >= size || dest_row < 0 || dest_row >= size {
                continue;
            }
            let (dest_col, dest_row) = (dest_col as usize, dest_row as usize);
            let existing = recentered.at(dest_col, dest_row);
            recentered.put(dest_col, dest_row, existing.max(value));
        }
    }
    Ok(recentered)
}

#[inline]
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::bounding_box::{DEFAULT_THRESHOLD, find_bounding_box};
    use crate::core_modules::brush::Brush;
    use std::ops::RangeInclusive;

    fn block(grid: &mut Grid, cols: RangeInclusive<i32>, rows: RangeInclusive<i32>, v: f64) {
        for col in cols {
            for row in rows.clone() {
                grid.set(col, row, v);
            }
        }
    }

    fn run(grid: &Grid, policy: ScalingPolicy) -> Grid {
        let bbox = find_bounding_box(grid, DEFAULT_THRESHOLD);
        recenter(grid, bbox.as_ref(), policy).expect("recenter")
    }

    fn mass_center(grid: &Grid) -> Centroid {
        let bbox = find_bounding_box(grid, 0.0).expect("content");
        centroid::centroid(grid, &bbox).expect("mass")
    }

    #[test]
    fn blank_canvas_passes_through() {
        let grid = Grid::new(28);
        for policy in [ScalingPolicy::Disabled, ScalingPolicy::default()] {
            assert_eq!(recenter(&grid, None, policy).expect("pass-through"), grid);
        }
    }

    #[test]
    fn translate_moves_corner_block_to_center() {
        let mut grid = Grid::new(28);
        block(&mut grid, 0..=2, 0..=2, 1.0);

        let moved = run(&grid, ScalingPolicy::Disabled);
        assert_eq!(mass_center(&moved), Centroid { x: 14.0, y: 14.0 });
        let nonzero = moved.values().iter().filter(|&&v| v > 0.0).count();
        assert_eq!(nonzero, 9);
        for col in 13..=15 {
            for row in 13..=15 {
                assert_eq!(moved.get(col, row), 1.0);
            }
        }
    }

    #[test]
    fn translate_keeps_shape_and_values() {
        let mut grid = Grid::new(28);
        grid.set(3, 4, 0.5);
        grid.set(4, 4, 1.0);
        grid.set(4, 5, 0.25);

        let moved = run(&grid, ScalingPolicy::Disabled);
        let mut source: Vec<f64> = grid.values().iter().copied().filter(|&v| v > 0.0).collect();
        let mut dest: Vec<f64> = moved.values().iter().copied().filter(|&v| v > 0.0).collect();
        source.sort_by(f64::total_cmp);
        dest.sort_by(f64::total_cmp);
        assert_eq!(source, dest);

        // Relative layout is preserved around the peak.
        let peak = moved.values().iter().position(|&v| v == 1.0).expect("peak");
        let (col, row) = ((peak % 28) as i32, (peak / 28) as i32);
        assert_eq!(moved.get(col - 1, row), 0.5);
        assert_eq!(moved.get(col, row + 1), 0.25);
    }

    #[test]
    fn translate_drops_fringe_outside_the_box() {
        let mut grid = Grid::new(28);
        block(&mut grid, 5..=7, 5..=7, 1.0);
        grid.set(20, 20, 0.05);

        let moved = run(&grid, ScalingPolicy::Disabled);
        let nonzero = moved.values().iter().filter(|&&v| v > 0.0).count();
        assert_eq!(nonzero, 9);
    }

    #[test]
    fn translate_clips_content_pushed_past_the_edge() {
        let mut grid = Grid::new(28);
        for col in 0..28 {
            grid.set(col, 0, if col >= 24 { 1.0 } else { 0.2 });
        }

        let moved = run(&grid, ScalingPolicy::Disabled);
        // Centroid x is about 17.86, so the row shifts left by 4 and its first
        // four cells fall off the grid.
        let row: Vec<f64> = (0..28).map(|c| moved.get(c, 14)).collect();
        assert_eq!(row.iter().filter(|&&v| v > 0.0).count(), 24);
        assert_eq!(row[23], 1.0);
        assert_eq!(row[20], 1.0);
        assert_eq!(row[19], 0.2);
        assert_eq!(row[24], 0.0);
    }

    #[test]
    fn scaling_leaves_small_digits_at_full_size() {
        let mut grid = Grid::new(28);
        block(&mut grid, 0..=2, 0..=2, 1.0);

        let moved = run(&grid, ScalingPolicy::default());
        assert_eq!(moved, run(&grid, ScalingPolicy::Disabled));
    }

    #[test]
    fn scaling_shrinks_oversized_digits_to_target() {
        let mut grid = Grid::new(28);
        for col in 0..28 {
            grid.set(col, 3, 0.5);
        }

        let moved = run(&grid, ScalingPolicy::default());
        let bbox = find_bounding_box(&moved, DEFAULT_THRESHOLD).expect("box");
        // A one-cell-high stroke stays one cell high.
        assert_eq!(bbox.height(), 1);
        let span = bbox.width();
        assert!(span <= DEFAULT_TARGET_SIZE + 1, "span {span}");
        assert!(span >= DEFAULT_TARGET_SIZE - 1, "span {span}");
    }

    #[test]
    fn scaling_resolves_collisions_by_maximum() {
        let mut grid = Grid::new(28);
        for col in 0..28 {
            grid.set(col, 10, if col % 3 == 0 { 0.7 } else { 0.4 });
        }

        let moved = run(&grid, ScalingPolicy::default());
        let values: Vec<f64> = moved.values().iter().copied().filter(|&v| v > 0.0).collect();
        assert!(values.len() < 28, "downscaling must merge some cells");
        assert!(values.iter().all(|&v| v == 0.4 || v == 0.7), "{values:?}");
        assert!(values.contains(&0.7));
    }

    #[test]
    fn scaling_keeps_faint_cells_outside_the_box() {
        let mut grid = Grid::new(28);
        block(&mut grid, 5..=7, 5..=7, 1.0);
        grid.set(9, 6, 0.05);

        let moved = run(&grid, ScalingPolicy::default());
        let nonzero = moved.values().iter().filter(|&&v| v > 0.0).count();
        assert_eq!(nonzero, 10);
        assert_eq!(moved.get(17, 14), 0.05);
    }

    #[test]
    fn placement_does_not_depend_on_where_the_digit_was_drawn() {
        for policy in [ScalingPolicy::Disabled, ScalingPolicy::default()] {
            let mut reference = None;
            for c in 1..27 {
                let mut grid = Grid::new(28);
                Brush::banded().stamp(&mut grid, c, c);
                let moved = run(&grid, policy);
                assert_eq!(moved.get(14, 14), 1.0, "{policy:?} stamp at {c}");
                match &reference {
                    None => reference = Some(moved),
                    Some(expected) => assert_eq!(&moved, expected, "{policy:?} stamp at {c}"),
                }
            }
        }
    }

    #[test]
    fn scaling_drops_fringe_mapped_past_the_edge() {
        let mut grid = Grid::new(28);
        // A digit hugging the right edge with a faint trail far to its left.
        block(&mut grid, 24..=26, 10..=12, 1.0);
        grid.set(2, 11, 0.05);
        grid.set(20, 11, 0.05);

        let moved = run(&grid, ScalingPolicy::default());
        // The block lands on 13..=15 (offset -11). The cell at column 2 would
        // land on -9 and is dropped; the one at column 20 lands on 9.
        let nonzero = moved.values().iter().filter(|&&v| v > 0.0).count();
        assert_eq!(nonzero, 10);
        assert_eq!(moved.get(9, 14), 0.05);
        for col in 13..=15 {
            assert_eq!(moved.get(col, 14), 1.0);
        }
    }

    #[test]
    fn scaling_honors_custom_target() {
        let mut grid = Grid::new(28);
        block(&mut grid, 4..=13, 4..=13, 1.0);

        let moved = run(&grid, ScalingPolicy::Enabled { target_size: 5 });
        let bbox = find_bounding_box(&moved, DEFAULT_THRESHOLD).expect("box");
        assert!(bbox.width() <= 6 && bbox.height() <= 6);
        assert!(moved.values().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}
