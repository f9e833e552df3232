// THEORY:
// The brush is the only writer of the live drawing grid. Each sampled pointer
// position is "stamped": a small square neighborhood around the focal cell
// receives a deposit whose strength falls off with Euclidean distance.
//
// Key architectural principles:
// 1.  **Pluggable Falloff**: Two falloff shapes are in use and neither is the
//     "right" one, so the distance-to-weight mapping is a strategy
//     (`Falloff`) selected by configuration instead of a hardcoded curve.
//     - `Banded`: full strength at the center, 80% for direct neighbors, 40%
//       for everything else in the square (typically radius 1, so diagonals).
//     - `Linear`: `1 - d / radius`, and nothing at or beyond the radius
//       (typically radius 2).
// 2.  **Saturating Accumulation**: Deposits are added and clamped, never
//     written over the old value. Overlapping strokes darken monotonically up
//     to 1.0, and the result depends on how much was deposited, not on order.
// 3.  **Permissive Input**: A focal point outside the grid is legal. Only the
//     in-bounds neighbors are written; nothing errors.

use crate::core_modules::grid::grid::{Coordinate, Grid, Intensity};
use tracing::trace;

/// Maps a distance from the focal cell to a deposit weight.
pub trait Falloff {
    /// Returns the weight in [0, 1] for a cell at `distance`, or `None` when the
    /// cell lies outside the brush's active range.
    fn weight(&self, distance: f64, radius: u32) -> Option<f64>;
}

/// The falloff shapes the drawing surface supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FalloffPolicy {
    /// Stepped weights: 1.0 within 0.5, 0.8 within 1.0, 0.4 beyond.
    #[default]
    Banded,
    /// Weight decays linearly to zero at the radius.
    Linear,
}

impl Falloff for FalloffPolicy {
    fn weight(&self, distance: f64, radius: u32) -> Option<f64> {
        match self {
            FalloffPolicy::Banded => Some(if distance <= 0.5 {
                1.0
            } else if distance <= 1.0 {
                0.8
            } else {
                0.4
            }),
            FalloffPolicy::Linear => {
                let radius = radius as f64;
                (distance < radius).then(|| 1.0 - distance / radius)
            }
        }
    }
}

/// Brush settings: how far a stamp reaches, how strong it is and how it fades.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Brush {
    /// Half-width of the square neighborhood visited around the focal cell.
    pub radius: u32,
    /// Peak deposit, in (0, 1].
    pub intensity: Intensity,
    pub falloff: FalloffPolicy,
}

impl Default for Brush {
    fn default() -> Self {
        Self::banded()
    }
}

impl Brush {
    /// Radius-1 pencil with stepped falloff.
    pub fn banded() -> Self {
        Self {
            radius: 1,
            intensity: 1.0,
            falloff: FalloffPolicy::Banded,
        }
    }

    /// Radius-2 marker with linear falloff.
    pub fn linear() -> Self {
        Self {
            radius: 2,
            intensity: 1.0,
            falloff: FalloffPolicy::Linear,
        }
    }

    /// Stamps this brush into `grid` around `(col, row)`.
    pub fn stamp(&self, grid: &mut Grid, col: Coordinate, row: Coordinate) {
        apply_brush(grid, col, row, self.intensity, self.radius, &self.falloff);
    }
}

/// Deposits falloff-weighted `intensity` into every in-bounds cell within
/// `radius` of `(col, row)`, accumulating with saturation.
pub fn apply_brush<F: Falloff + ?Sized>(
    grid: &mut Grid,
    col: Coordinate,
    row: Coordinate,
    intensity: Intensity,
    radius: u32,
    falloff: &F,
) {
    let reach = radius.min(i32::MAX as u32) as i32;
    let mut touched = 0usize;

    for dx in -reach..=reach {
        for dy in -reach..=reach {
            let distance = (dx as f64).hypot(dy as f64);
            let Some(weight) = falloff.weight(distance, radius) else {
                continue;
            };
            if grid.accumulate(col.saturating_add(dx), row.saturating_add(dy), intensity * weight) {
                touched += 1;
            }
        }
    }

    if touched == 0 {
        trace!(col, row, "brush stamp landed outside the grid");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banded_stamp_matches_pencil_profile() {
        let mut grid = Grid::new(28);
        Brush::banded().stamp(&mut grid, 10, 10);

        assert_eq!(grid.get(10, 10), 1.0);
        assert_eq!(grid.get(11, 10), 0.8);
        assert_eq!(grid.get(10, 9), 0.8);
        assert_eq!(grid.get(11, 11), 0.4);
        assert_eq!(grid.get(9, 9), 0.4);
        assert_eq!(grid.get(12, 10), 0.0);
    }

    #[test]
    fn linear_stamp_fades_to_zero_at_radius() {
        let mut grid = Grid::new(28);
        let brush = Brush {
            intensity: 0.5,
            ..Brush::linear()
        };
        brush.stamp(&mut grid, 10, 10);

        assert_eq!(grid.get(10, 10), 0.5);
        assert!((grid.get(11, 10) - 0.25).abs() < 1e-12);
        let diagonal = 0.5 * (1.0 - 2f64.sqrt() / 2.0);
        assert!((grid.get(11, 11) - diagonal).abs() < 1e-12);
        // Distance exactly 2 is outside the active range.
        assert_eq!(grid.get(12, 10), 0.0);
        assert_eq!(grid.get(12, 12), 0.0);
    }

    #[test]
    fn overlapping_stamps_saturate_instead_of_overflowing() {
        let mut grid = Grid::new(28);
        let brush = Brush {
            intensity: 0.6,
            ..Brush::linear()
        };
        brush.stamp(&mut grid, 5, 5);
        assert!((grid.get(5, 5) - 0.6).abs() < 1e-12);
        brush.stamp(&mut grid, 5, 5);
        assert_eq!(grid.get(5, 5), 1.0);
    }

    #[test]
    fn accumulation_is_order_independent_below_saturation() {
        let brush = Brush {
            intensity: 0.2,
            ..Brush::banded()
        };
        let mut forward = Grid::new(28);
        brush.stamp(&mut forward, 4, 4);
        brush.stamp(&mut forward, 5, 4);

        let mut backward = Grid::new(28);
        brush.stamp(&mut backward, 5, 4);
        brush.stamp(&mut backward, 4, 4);

        for (a, b) in forward.values().iter().zip(backward.values()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn stamp_at_corner_only_writes_in_bounds_cells() {
        let mut grid = Grid::new(28);
        Brush::banded().stamp(&mut grid, 0, 0);
        assert_eq!(grid.get(0, 0), 1.0);
        assert_eq!(grid.get(1, 0), 0.8);
        assert_eq!(grid.get(1, 1), 0.4);
        let nonzero = grid.values().iter().filter(|&&v| v > 0.0).count();
        assert_eq!(nonzero, 4);
    }

    #[test]
    fn stamp_far_outside_is_silent() {
        let mut grid = Grid::new(28);
        Brush::linear().stamp(&mut grid, -100, 500);
        Brush::banded().stamp(&mut grid, i32::MAX, i32::MIN);
        assert!(grid.is_blank());
    }

    #[test]
    fn focal_point_just_outside_still_paints_neighbors() {
        let mut grid = Grid::new(28);
        Brush::banded().stamp(&mut grid, -1, 5);
        assert_eq!(grid.get(0, 5), 0.8);
        assert_eq!(grid.get(0, 4), 0.4);
    }

    #[test]
    fn custom_falloff_strategy_is_accepted() {
        struct Flat;
        impl Falloff for Flat {
            fn weight(&self, _distance: f64, _radius: u32) -> Option<f64> {
                Some(0.5)
            }
        }

        let mut grid = Grid::new(8);
        apply_brush(&mut grid, 3, 3, 1.0, 1, &Flat);
        assert_eq!(grid.get(2, 2), 0.5);
        assert_eq!(grid.get(3, 3), 0.5);
    }
}
