// THEORY:
// The centroid (center of mass) is the intensity-weighted mean position of a
// region. It is what the recenter stage aligns with the middle of the grid,
// which is how the reference corpus positions its digits: by mass, not by the
// bounding box.
//
// A centroid only exists when the region carries some mass. Dividing by a zero
// total would silently produce NaN and poison every later stage, so the zero
// case is an explicit `CanvasError::NoMass` instead.
//
// Sums run in box-local coordinates. The same shape drawn anywhere on the grid
// then yields bit-identical local centroids, so rounding ties downstream break
// the same way wherever the digit was drawn.

use crate::core_modules::bounding_box::BoundingBox;
use crate::core_modules::error::CanvasError;
use crate::core_modules::grid::grid::Grid;

/// An intensity-weighted mean position in (col, row) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

/// Centroid of every cell of `grid` inside `bbox`, in grid coordinates.
pub fn centroid(grid: &Grid, bbox: &BoundingBox) -> Result<Centroid, CanvasError> {
    let local = local_centroid(grid, bbox)?;
    Ok(Centroid {
        x: bbox.min_col() as f64 + local.x,
        y: bbox.min_row() as f64 + local.y,
    })
}

/// Centroid of the cells inside `bbox`, relative to the box's top-left corner.
pub fn local_centroid(grid: &Grid, bbox: &BoundingBox) -> Result<Centroid, CanvasError> {
    let (origin_col, origin_row) = (bbox.min_col(), bbox.min_row());
    weighted_centroid(bbox.cells().map(|(col, row)| {
        (
            (col - origin_col) as f64,
            (row - origin_row) as f64,
            grid.get(col as i32, row as i32),
        )
    }))
}

/// Centroid of an arbitrary set of `(x, y, mass)` samples.
pub fn weighted_centroid<I>(samples: I) -> Result<Centroid, CanvasError>
where
    I: IntoIterator<Item = (f64, f64, f64)>,
{
    let mut sum_mass = 0.0;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;

    for (x, y, mass) in samples {
        sum_mass += mass;
        sum_x += x * mass;
        sum_y += y * mass;
    }

    if sum_mass <= 0.0 {
        return Err(CanvasError::NoMass);
    }

    Ok(Centroid {
        x: sum_x / sum_mass,
        y: sum_y / sum_mass,
    })
}
