//! Grid dimensions and index arithmetic.

/// Dimensions of the cell grid.
///
/// Both dimensions are at least 1, so index arithmetic never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize {
    width: u16,
    height: u16,
}

impl GridSize {
    /// Create grid dimensions, clamping zero to one.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Grid width in columns.
    #[must_use]
    pub const fn width(self) -> u16 {
        self.width
    }

    /// Grid height in rows.
    #[must_use]
    pub const fn height(self) -> u16 {
        self.height
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Row-major index of `(x, y)`, wrapped modulo the cell count.
    ///
    /// Negative or overflowing coordinates alias onto the grid instead of
    /// faulting: `x` past the right edge continues on the next row, and
    /// anything past the last cell continues from the first.
    #[must_use]
    pub fn wrap_index(self, x: i32, y: i32) -> usize {
        self.wrap_point(i64::from(x), i64::from(y))
    }

    /// [`GridSize::wrap_index`] for coordinates that may lie outside the
    /// `i32` range, such as far corners of an oversized box.
    #[must_use]
    pub fn wrap_point(self, x: i64, y: i64) -> usize {
        let linear = i128::from(y) * i128::from(self.width) + i128::from(x);
        linear.rem_euclid(self.cell_count() as i128) as usize
    }

    /// Row of `index`.
    #[must_use]
    pub const fn row(self, index: usize) -> usize {
        index / self.width as usize
    }

    /// Convert a linear index to `(column, row)`.
    #[must_use]
    pub const fn coords(self, index: usize) -> (u16, u16) {
        let width = self.width as usize;
        ((index % width) as u16, (index / width) as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grid_clamps_zero() {
        let grid = GridSize::new(0, 0);
        assert_eq!(grid.width(), 1);
        assert_eq!(grid.height(), 1);
        assert_eq!(grid.cell_count(), 1);
    }

    #[test]
    fn test_wrap_index_in_range() {
        let grid = GridSize::new(10, 5);
        assert_eq!(grid.wrap_index(0, 0), 0);
        assert_eq!(grid.wrap_index(5, 2), 25);
        assert_eq!(grid.wrap_index(9, 4), 49);
    }

    #[test]
    fn test_wrap_index_overflowing_x_continues_next_row() {
        let grid = GridSize::new(10, 5);
        assert_eq!(grid.wrap_index(12, 0), 12);
        assert_eq!(grid.coords(12), (2, 1));
    }

    #[test]
    fn test_wrap_index_past_end_aliases_to_start() {
        let grid = GridSize::new(10, 5);
        assert_eq!(grid.wrap_index(0, 5), 0);
        assert_eq!(grid.wrap_index(3, 7), 23);
    }

    #[test]
    fn test_wrap_index_negative() {
        let grid = GridSize::new(10, 5);
        assert_eq!(grid.wrap_index(-1, 0), 49);
        assert_eq!(grid.wrap_index(0, -1), 40);
    }

    #[test]
    fn test_coords_and_row() {
        let grid = GridSize::new(10, 5);
        assert_eq!(grid.coords(0), (0, 0));
        assert_eq!(grid.coords(25), (5, 2));
        assert_eq!(grid.row(25), 2);
        assert_eq!(grid.row(9), 0);
    }

    #[test]
    fn test_wrap_point_extreme_coordinates() {
        let grid = GridSize::new(10, 5);
        assert_eq!(grid.wrap_point(5, 2), grid.wrap_index(5, 2));
        assert_eq!(grid.wrap_point(-1, 0), 49);
        assert!(grid.wrap_point(i64::MAX, i64::MAX) < 50);
        assert!(grid.wrap_point(i64::MIN, i64::MIN) < 50);
        let far = i64::from(i32::MAX) + 3;
        assert_eq!(grid.wrap_point(far, 0), (far % 50) as usize);
    }

    proptest! {
        #[test]
        fn prop_wrap_index_always_in_range(
            w in 1u16..300, h in 1u16..200, x in any::<i32>(), y in any::<i32>()
        ) {
            let grid = GridSize::new(w, h);
            prop_assert!(grid.wrap_index(x, y) < grid.cell_count());
        }
    }
}
