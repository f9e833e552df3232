// THEORY:
// The `Grid` is the one shared data structure of the canvas engine. Every other
// module either writes into it (the brush, while the user draws) or reads one
// and produces a fresh one (every normalization stage).
//
// Key architectural principles:
// 1.  **Fixed Square Shape**: A grid is always N x N. N is a runtime value
//     (28 for MNIST), never a literal baked into the stages, and no stage ever
//     changes it.
// 2.  **Bounded Values**: Every cell holds an intensity in [0, 1]. The write
//     paths clamp, so the invariant holds no matter what a caller hands in.
// 3.  **Permissive Addressing**: Pointer input can land anywhere, so the signed
//     `get`/`set` accessors treat out-of-range coordinates as empty space: reads
//     return 0.0 and writes are dropped. Nothing ever indexes out of bounds.
// 4.  **(col, row) Convention**: Accessors take the column first, matching how
//     the drawing surface is addressed. Storage is row-major so that the
//     serializer's row-outer scan walks memory linearly.

pub mod grid {
    pub type Intensity = f64;
    pub type Coordinate = i32;

    /// A dense N x N buffer of intensities in [0, 1].
    #[derive(Debug, Clone, PartialEq)]
    pub struct Grid {
        /// The side length N of the grid.
        size: usize,
        /// Row-major cell storage, `size * size` entries.
        cells: Vec<Intensity>,
    }

    impl Grid {
        /// Creates an all-zero grid of `size` x `size` cells.
        pub fn new(size: usize) -> Self {
            Self {
                size,
                cells: vec![0.0; size * size],
            }
        }

        /// Returns a new all-zero grid with the same dimensions.
        pub fn cleared(&self) -> Self {
            Self::new(self.size)
        }

        pub fn size(&self) -> usize {
            self.size
        }

        /// The geometric center `(N - 1) / 2`, shared by both axes.
        pub fn center(&self) -> f64 {
            (self.size as f64 - 1.0) / 2.0
        }

        /// Reads a cell. Out-of-range coordinates read as 0.0.
        pub fn get(&self, col: Coordinate, row: Coordinate) -> Intensity {
            self.index(col, row).map_or(0.0, |i| self.cells[i])
        }

        /// Writes a cell, clamping the value into [0, 1].
        /// Returns `false` (and writes nothing) for out-of-range coordinates.
        pub fn set(&mut self, col: Coordinate, row: Coordinate, value: Intensity) -> bool {
            match self.index(col, row) {
                Some(i) => {
                    self.cells[i] = clamp_unit(value);
                    true
                }
                None => false,
            }
        }

        /// Adds `deposit` to a cell with saturation at [0, 1].
        /// Returns `false` for out-of-range coordinates.
        pub fn accumulate(&mut self, col: Coordinate, row: Coordinate, deposit: Intensity) -> bool {
            match self.index(col, row) {
                Some(i) => {
                    self.cells[i] = clamp_unit(self.cells[i] + deposit);
                    true
                }
                None => false,
            }
        }

        /// Direct accessor for stages iterating over `0..size`. Panics out of range.
        #[inline]
        pub(crate) fn at(&self, col: usize, row: usize) -> Intensity {
            self.cells[row * self.size + col]
        }

        #[inline]
        pub(crate) fn put(&mut self, col: usize, row: usize, value: Intensity) {
            self.cells[row * self.size + col] = clamp_unit(value);
        }

        /// Raw row-major view of the cells.
        pub fn values(&self) -> &[Intensity] {
            &self.cells
        }

        /// The largest cell value, 0.0 for a blank grid.
        pub fn max_value(&self) -> Intensity {
            self.cells.iter().copied().fold(0.0, f64::max)
        }

        /// Sum of every cell value.
        pub fn total_mass(&self) -> Intensity {
            self.cells.iter().sum()
        }

        pub fn is_blank(&self) -> bool {
            self.cells.iter().all(|&v| v == 0.0)
        }

        fn index(&self, col: Coordinate, row: Coordinate) -> Option<usize> {
            let n = self.size as i64;
            let (c, r) = (col as i64, row as i64);
            if c >= 0 && c < n && r >= 0 && r < n {
                Some(r as usize * self.size + c as usize)
            } else {
                None
            }
        }
    }

    #[inline]
    fn clamp_unit(value: Intensity) -> Intensity {
        if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
    }
}
