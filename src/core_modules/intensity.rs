// THEORY:
// Strokes drawn with a light touch, or thinned out by the smoother, rarely
// reach full intensity. Reference digits always do, so the last transform
// stretches the grid so that its brightest cell is exactly 1.0.
//
// A blank grid has nothing to stretch; it is returned unchanged instead of
// dividing by zero.

use crate::core_modules::grid::grid::Grid;

/// Rescales every cell by the grid's maximum so the brightest cell becomes 1.0.
pub fn normalize(grid: &Grid) -> Grid {
    let max_value = grid.max_value();
    if max_value == 0.0 {
        return grid.clone();
    }

    let mut normalized = grid.cleared();
    let size = grid.size();
    for row in 0..size {
        for col in 0..size {
            normalized.put(col, row, grid.at(col, row) / max_value);
        }
    }
    normalized
}
