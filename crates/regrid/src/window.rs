//! Rectangular pixel regions: the crop window of interest on the full canvas and
//! crop-local patches.

use std::ops::Range;

use crate::{Cell, Error, RasterSize, Result};

/// Half open rectangular region `[row_start, row_end) x [col_start, col_end)` of the full canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CropWindow {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl CropWindow {
    pub fn new(rows: Range<usize>, cols: Range<usize>) -> Result<Self> {
        if rows.is_empty() || cols.is_empty() {
            return Err(Error::InvalidConfiguration(format!(
                "Crop window rows {}..{} cols {}..{} is empty",
                rows.start, rows.end, cols.start, cols.end
            )));
        }

        Ok(CropWindow {
            row_start: rows.start,
            row_end: rows.end,
            col_start: cols.start,
            col_end: cols.end,
        })
    }

    /// A window covering the complete canvas
    pub const fn full(size: RasterSize) -> Self {
        CropWindow {
            row_start: 0,
            row_end: size.rows,
            col_start: 0,
            col_end: size.cols,
        }
    }

    pub fn size(&self) -> RasterSize {
        RasterSize::with_rows_cols(self.row_end - self.row_start, self.col_end - self.col_start)
    }

    pub fn rows(&self) -> Range<usize> {
        self.row_start..self.row_end
    }

    pub fn cols(&self) -> Range<usize> {
        self.col_start..self.col_end
    }

    pub fn fits_in(&self, canvas: RasterSize) -> bool {
        self.row_end <= canvas.rows && self.col_end <= canvas.cols
    }

    /// Canvas cell to window-local cell, `None` if the cell lies outside the window.
    pub fn to_local(&self, row: usize, col: usize) -> Option<Cell> {
        if self.rows().contains(&row) && self.cols().contains(&col) {
            Some(Cell::from_row_col(row - self.row_start, col - self.col_start))
        } else {
            None
        }
    }
}

impl std::fmt::Display for CropWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}:{}, {}:{}]", self.row_start, self.row_end, self.col_start, self.col_end)
    }
}

/// Half open rectangle in crop-local pixel coordinates, used for the fixed land patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PixelRect {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl PixelRect {
    pub const fn new(rows: Range<usize>, cols: Range<usize>) -> Self {
        PixelRect {
            row_start: rows.start,
            row_end: rows.end,
            col_start: cols.start,
            col_end: cols.end,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_start >= self.row_end || self.col_start >= self.col_end
    }

    pub fn fits_in(&self, size: RasterSize) -> bool {
        self.row_end <= size.rows && self.col_end <= size.cols
    }

    pub fn rows(&self) -> Range<usize> {
        self.row_start..self.row_end
    }

    pub fn cols(&self) -> Range<usize> {
        self.col_start..self.col_end
    }
}
