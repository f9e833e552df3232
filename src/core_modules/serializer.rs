// THEORY:
// The serializer is the boundary between the canvas engine and the outside
// world. It flattens a grid into the exact byte layout the classifier was
// trained on: N * N values in 0..=255, **row index outer, column index inner**.
//
// The grid itself is addressed as (col, row), so the scan order here is the
// transpose of that convention. That ordering is part of the wire contract with
// the classifier, not a style choice: swapping the loops hands the model a
// mirrored, rotated digit.

use crate::core_modules::grid::grid::{Grid, Intensity};

pub type Byte = u8;

/// Flattens `grid` row by row, mapping each value `v` to `round(v * 255)`.
pub fn serialize(grid: &Grid) -> Vec<Byte> {
    let size = grid.size();
    let mut data = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            data.push(to_byte(grid.at(col, row)));
        }
    }
    data
}

#[inline]
pub(crate) fn to_byte(value: Intensity) -> Byte {
    (value * 255.0).round().clamp(0.0, 255.0) as Byte
}
