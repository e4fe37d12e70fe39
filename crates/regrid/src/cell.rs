use crate::RasterSize;

/// Represents a position in a grid or raster using row, col coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn from_row_col(row: usize, col: usize) -> Self {
        Cell { row, col }
    }

    pub fn increment(&mut self, cols_in_grid: usize) {
        self.col += 1;
        if self.col >= cols_in_grid {
            self.col = 0;
            self.row += 1;
        }
    }

    pub const fn index_in_raster(&self, cols_in_grid: usize) -> usize {
        self.row * cols_in_grid + self.col
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.row.cmp(&other.row).then(self.col.cmp(&other.col))
    }
}

/// Iterator over the cells of a grid
/// Iteration will occur from the top-left cell to the bottom-right cell in row-major order,
/// which is the order in which overlapping splats are resolved.
pub struct CellIterator {
    rows: usize,
    cols: usize,
    current: Cell,
}

impl CellIterator {
    pub fn for_raster_with_size(size: RasterSize) -> Self {
        CellIterator {
            rows: size.rows,
            cols: size.cols,
            current: Cell::from_row_col(0, 0),
        }
    }
}

impl Iterator for CellIterator {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cols == 0 || self.current.row >= self.rows {
            return None;
        }

        let current = self.current;
        self.current.increment(self.cols);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterate_row_major() {
        let cells: Vec<Cell> = CellIterator::for_raster_with_size(RasterSize::with_rows_cols(2, 3)).collect();
        assert_eq!(
            cells,
            vec![
                Cell::from_row_col(0, 0),
                Cell::from_row_col(0, 1),
                Cell::from_row_col(0, 2),
                Cell::from_row_col(1, 0),
                Cell::from_row_col(1, 1),
                Cell::from_row_col(1, 2),
            ]
        );

        let mut sorted = cells.clone();
        sorted.sort();
        assert_eq!(sorted, cells);
    }

    #[test]
    fn iterate_empty() {
        assert_eq!(CellIterator::for_raster_with_size(RasterSize::with_rows_cols(3, 0)).count(), 0);
        assert_eq!(CellIterator::for_raster_with_size(RasterSize::empty()).count(), 0);
    }

    #[test]
    fn index_in_raster() {
        assert_eq!(Cell::from_row_col(2, 1).index_in_raster(4), 9);
    }
}
