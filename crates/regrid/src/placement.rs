//! Index based placement of cells with precomputed rotated coordinates (`xr`, `yr`).
//!
//! This is the calibration used for the residence time output: the rotated coordinates are offset, scaled
//! to pixels, truncated and shifted by a fixed number of rows and columns straight into the cropped raster.
//! It is a different calibration than the projected rotation used by the other products, so it is kept as
//! a separate path instead of being folded into [`crate::RotationTransform`].

use crate::rasterizer::{PixelSnap, ScatterRasterizer, SplatOptions};
use crate::{Cell, CropWindow, Error, Point, RasterNum, RasterSize, Result, ScalarField};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexedPlacement {
    pub x_offset: f64,
    pub y_offset: f64,
    /// Pixels per unit of the rotated coordinates
    pub factor: f64,
    pub row_shift: i64,
    pub col_shift: i64,
    /// Half size of the written block, a radius of 2 writes `[c - 2, c + 3)`
    pub radius: usize,
    pub output: RasterSize,
}

impl IndexedPlacement {
    /// Calibration of the residence time output of the 200m Wadden Sea model
    pub const fn dws_residence_time() -> Self {
        Self::for_output(RasterSize::with_rows_cols(800, 1200))
    }

    pub const fn for_output(output: RasterSize) -> Self {
        IndexedPlacement {
            x_offset: 116.7,
            y_offset: 543.3,
            factor: 10.0,
            row_shift: 34,
            col_shift: 165,
            radius: 2,
            output,
        }
    }

    pub fn output_size(&self) -> RasterSize {
        self.output
    }

    pub fn validate(&self) -> Result<()> {
        if !self.x_offset.is_finite() || !self.y_offset.is_finite() {
            return Err(Error::InvalidConfiguration("Placement offsets must be finite".into()));
        }

        if !self.factor.is_finite() || self.factor <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "Placement factor must be positive, got {}",
                self.factor
            )));
        }

        if self.output.is_empty() {
            return Err(Error::InvalidConfiguration("Placement output is empty".into()));
        }

        Ok(())
    }

    /// Output pixel (x = column, y = row) of a rotated coordinate, NaN when the coordinate is not finite
    pub fn pixel(&self, xr: f64, yr: f64) -> Point {
        match (
            PixelSnap::Truncate.snap((xr - self.x_offset) * self.factor),
            PixelSnap::Truncate.snap((yr - self.y_offset) * self.factor),
        ) {
            (Some(col), Some(row)) => match (col.checked_add(self.col_shift), row.checked_add(self.row_shift)) {
                (Some(col), Some(row)) => Point::new(col as f64, row as f64),
                _ => Point::new(f64::NAN, f64::NAN),
            },
            _ => Point::new(f64::NAN, f64::NAN),
        }
    }

    /// Build the rasterizer for a grid with rotated coordinate fields `xr` and `yr`.
    ///
    /// Every cell is placed, without validity filtering. Cells are visited column by column, so on overlap
    /// the cell with the highest column (and then row) index wins.
    pub fn rasterizer<T: RasterNum>(&self, xr: &ScalarField<T>, yr: &ScalarField<T>) -> Result<ScatterRasterizer> {
        self.validate()?;

        if xr.size() != yr.size() {
            return Err(Error::ShapeMismatch {
                field: "yr".into(),
                expected: xr.size(),
                actual: yr.size(),
            });
        }

        let size = xr.size();
        let (xr, yr) = (xr.frame(0), yr.frame(0));
        let pixels = (0..size.cols)
            .flat_map(|col| (0..size.rows).map(move |row| Cell::from_row_col(row, col)))
            .map(|cell| {
                let index = cell.index_in_raster(size.cols);
                let x = xr[index].to_f64().unwrap_or(f64::NAN);
                let y = yr[index].to_f64().unwrap_or(f64::NAN);
                (cell, self.pixel(x, y))
            });

        let options = SplatOptions {
            canvas: self.output,
            window: CropWindow::full(self.output),
            radius: self.radius,
            snap: PixelSnap::Nearest,
        };

        Ok(ScatterRasterizer::new(size, pixels, &options))
    }
}
