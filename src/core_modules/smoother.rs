// THEORY:
// Drawing on a 28x28 grid leaves hard, blocky edges that the reference corpus
// (anti-aliased scans) never has. The smoother softens them with a fixed 3x3
// Gaussian kernel:
//
//     1 2 1
//     2 4 2   / 16
//     1 2 1
//
// The weights sum to 1, so interior mass is roughly conserved.
//
// Boundary policy: only interior cells (row and column strictly between 0 and
// N - 1) are convolved. The outermost ring of the output is always zero. The
// convolution never reads past the edge, and never wraps or clamps neighbors to
// fake a full neighborhood.

use crate::core_modules::grid::grid::{Grid, Intensity};

/// Normalized 3x3 blur kernel, indexed `[row offset + 1][col offset + 1]`.
pub const KERNEL: [[Intensity; 3]; 3] = [
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
    [2.0 / 16.0, 4.0 / 16.0, 2.0 / 16.0],
    [1.0 / 16.0, 2.0 / 16.0, 1.0 / 16.0],
];

/// Blurs every interior cell of `grid` into a new grid; border cells become zero.
pub fn smooth(grid: &Grid) -> Grid {
    let size = grid.size();
    let mut smoothed = grid.cleared();
    if size < 3 {
        return smoothed;
    }

    for row in 1..size - 1 {
        for col in 1..size - 1 {
            let mut sum = 0.0;
            for (k_row, weights) in KERNEL.iter().enumerate() {
                for (k_col, weight) in weights.iter().enumerate() {
                    sum += grid.at(col + k_col - 1, row + k_row - 1) * weight;
                }
            }
            smoothed.put(col, row, sum);
        }
    }
    smoothed
}
