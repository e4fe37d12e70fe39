//! Splat rasterization of scattered, rotated source cells onto the fixed canvas.
//!
//! Every source cell writes its value into the square neighbourhood around its snapped pixel. There is no
//! blending: overlapping neighbourhoods are resolved by the source-grid iteration order (row-major, the last
//! write wins). Only the pixels inside the crop window are materialized, which gives the same result as
//! rasterizing the complete canvas and cropping it afterwards.

use std::ops::Range;

use crate::{Cell, CropWindow, DenseRaster, Error, Point, RasterNum, RasterSize, RasterStack, RegridConfig, Result, ScalarField};

/// How a fractional pixel coordinate is mapped to a pixel index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PixelSnap {
    /// Round to the nearest pixel
    #[default]
    Nearest,
    /// Truncate towards zero like an integer cast
    Truncate,
}

impl PixelSnap {
    /// `None` for coordinates that are not finite
    pub fn snap(self, val: f64) -> Option<i64> {
        if !val.is_finite() {
            return None;
        }

        let snapped = match self {
            PixelSnap::Nearest => val.round(),
            PixelSnap::Truncate => val.trunc(),
        };

        Some(snapped as i64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplatOptions {
    pub canvas: RasterSize,
    pub window: CropWindow,
    pub radius: usize,
    pub snap: PixelSnap,
}

impl SplatOptions {
    pub fn from_config(config: &RegridConfig) -> Self {
        SplatOptions {
            canvas: config.canvas(),
            window: *config.crop(),
            radius: config.splat_radius(),
            snap: config.snap(),
        }
    }
}

/// Outcome of mapping the source cells onto the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RasterizeStats {
    /// Cells offered to the rasterizer
    pub cells: usize,
    /// Cells whose snapped pixel lies on the canvas
    pub placed: usize,
    /// Cells whose snapped pixel lies outside the canvas (or is not finite)
    pub dropped: usize,
    /// Placed cells whose neighbourhood does not touch the crop window
    pub outside_window: usize,
}

/// Window-local pixel block written by one source cell
#[derive(Debug, Clone, PartialEq, Eq)]
struct Footprint {
    cell: Cell,
    rows: Range<usize>,
    cols: Range<usize>,
}

/// Mapping of source cells to the pixel blocks they cover, built once per dataset and reused for every
/// frame and every field.
#[derive(Debug, Clone)]
pub struct ScatterRasterizer {
    source_size: RasterSize,
    window: CropWindow,
    footprints: Vec<Footprint>,
    stats: RasterizeStats,
}

impl ScatterRasterizer {
    /// `pixels` holds the canvas pixel coordinate (x = column, y = row) of each source cell, in the order
    /// the values should be written.
    pub fn new(source_size: RasterSize, pixels: impl IntoIterator<Item = (Cell, Point)>, options: &SplatOptions) -> Self {
        let mut stats = RasterizeStats::default();
        let mut footprints = Vec::new();
        let radius = options.radius as i64;
        let canvas = options.canvas;
        let window = options.window;

        for (cell, pixel) in pixels {
            stats.cells += 1;

            let (Some(col), Some(row)) = (options.snap.snap(pixel.x()), options.snap.snap(pixel.y())) else {
                stats.dropped += 1;
                continue;
            };

            if !canvas.contains(row, col) {
                log::trace!("Cell {cell:?} maps to pixel ({row}, {col}) outside the canvas");
                stats.dropped += 1;
                continue;
            }

            stats.placed += 1;

            // Neighbourhood clipped to the canvas, then to the crop window
            let row_start = (row - radius).max(0).max(window.row_start as i64);
            let row_end = (row + radius + 1).min(canvas.rows as i64).min(window.row_end as i64);
            let col_start = (col - radius).max(0).max(window.col_start as i64);
            let col_end = (col + radius + 1).min(canvas.cols as i64).min(window.col_end as i64);

            if row_start >= row_end || col_start >= col_end {
                stats.outside_window += 1;
                continue;
            }

            footprints.push(Footprint {
                cell,
                rows: (row_start as usize - window.row_start)..(row_end as usize - window.row_start),
                cols: (col_start as usize - window.col_start)..(col_end as usize - window.col_start),
            });
        }

        if stats.dropped > 0 {
            log::warn!(
                "{} of {} cells fall outside the {} canvas and were dropped",
                stats.dropped,
                stats.cells,
                canvas
            );
        }

        log::debug!(
            "Splat plan: {} cells placed, {} within crop window {}",
            stats.placed,
            footprints.len(),
            window
        );

        ScatterRasterizer {
            source_size,
            window,
            footprints,
            stats,
        }
    }

    pub fn stats(&self) -> RasterizeStats {
        self.stats
    }

    pub fn window(&self) -> &CropWindow {
        &self.window
    }

    /// Size of the produced rasters
    pub fn output_size(&self) -> RasterSize {
        self.window.size()
    }

    fn splat_frame<T: RasterNum>(&self, value_of: impl Fn(Cell) -> T, target: &mut DenseRaster<T>) {
        let cols = target.width();
        let data = target.as_mut_slice();
        for footprint in &self.footprints {
            let val = value_of(footprint.cell);
            for row in footprint.rows.clone() {
                data[row * cols + footprint.cols.start..row * cols + footprint.cols.end].fill(val);
            }
        }
    }

    /// Rasterize a single frame of source values (row-major, shaped like the source grid)
    pub fn rasterize_frame<T: RasterNum>(&self, values: &[T]) -> Result<DenseRaster<T>> {
        if values.len() != self.source_size.cell_count() {
            return Err(Error::InvalidArgument(format!(
                "Frame holds {} values, the source grid {} has {} cells",
                values.len(),
                self.source_size,
                self.source_size.cell_count()
            )));
        }

        let mut raster = DenseRaster::filled_with_nodata(self.output_size());
        let cols = self.source_size.cols;
        self.splat_frame(|cell| values[cell.index_in_raster(cols)], &mut raster);
        Ok(raster)
    }

    /// Rasterize every frame of the field, frames are independent of each other
    pub fn rasterize<T: RasterNum>(&self, name: &str, field: &ScalarField<T>) -> Result<RasterStack<T>> {
        if field.size() != self.source_size {
            return Err(Error::ShapeMismatch {
                field: name.to_string(),
                expected: self.source_size,
                actual: field.size(),
            });
        }

        let mut stack = RasterStack::filled_with_nodata(field.frame_count(), self.output_size());

        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            stack
                .frames_mut()
                .par_iter_mut()
                .enumerate()
                .for_each(|(index, raster)| self.splat_frame(|cell| field.value(index, cell), raster));
        }

        #[cfg(not(feature = "rayon"))]
        stack
            .frames_mut()
            .iter_mut()
            .enumerate()
            .for_each(|(index, raster)| self.splat_frame(|cell| field.value(index, cell), raster));

        Ok(stack)
    }

    /// Rasterize the same value for every placed cell
    pub fn rasterize_constant<T: RasterNum>(&self, val: T) -> DenseRaster<T> {
        let mut raster = DenseRaster::filled_with_nodata(self.output_size());
        self.splat_frame(|_| val, &mut raster);
        raster
    }
}

#[cfg(test)]
#[generic_tests::define]
mod tests {
    use super::*;
    use crate::testutils::{NOD, compare_fp_vectors, create_vec};

    fn options(canvas: RasterSize, window: CropWindow) -> SplatOptions {
        SplatOptions {
            canvas,
            window,
            radius: 1,
            snap: PixelSnap::Nearest,
        }
    }

    #[test]
    fn splat_clipped_at_canvas_corner<T: RasterNum>() -> Result<()> {
        let canvas = RasterSize::square(10);
        let rasterizer = ScatterRasterizer::new(
            RasterSize::with_rows_cols(2, 2),
            [(Cell::from_row_col(0, 0), Point::new(0.0, 0.0))],
            &options(canvas, CropWindow::new(0..5, 0..5)?),
        );

        let raster = rasterizer.rasterize_frame(&create_vec::<T>(&[5.0, 1.0, 2.0, 3.0]))?;
        #[rustfmt::skip]
        let expected = create_vec::<T>(&[
            5.0, 5.0, NOD, NOD, NOD,
            5.0, 5.0, NOD, NOD, NOD,
            NOD, NOD, NOD, NOD, NOD,
            NOD, NOD, NOD, NOD, NOD,
            NOD, NOD, NOD, NOD, NOD,
        ]);

        assert_eq!(raster.size(), RasterSize::with_rows_cols(5, 5));
        assert!(compare_fp_vectors(raster.as_slice(), &expected));
        Ok(())
    }

    #[test]
    fn value_written_exactly_without_overlap<T: RasterNum>() -> Result<()> {
        let canvas = RasterSize::square(20);
        let pixels = [
            (Cell::from_row_col(0, 0), Point::new(3.2, 4.4)),
            (Cell::from_row_col(0, 1), Point::new(10.6, 4.0)),
            (Cell::from_row_col(1, 0), Point::new(3.0, 14.49)),
        ];
        let rasterizer = ScatterRasterizer::new(RasterSize::with_rows_cols(2, 2), pixels, &options(canvas, CropWindow::full(canvas)));
        let values = create_vec::<T>(&[1.25, -7.5, 1e6, 42.0]);
        let raster = rasterizer.rasterize_frame(&values)?;

        assert_eq!(raster[Cell::from_row_col(4, 3)], values[0]);
        assert_eq!(raster[Cell::from_row_col(4, 11)], values[1]);
        assert_eq!(raster[Cell::from_row_col(14, 3)], values[2]);
        assert_eq!(raster.data_count(), 27);
        Ok(())
    }

    #[test]
    fn canvas_edges_are_retained<T: RasterNum>() -> Result<()> {
        let canvas = RasterSize::square(6400);
        let pixels = [
            (Cell::from_row_col(0, 0), Point::new(0.0, 0.0)),
            (Cell::from_row_col(0, 1), Point::new(6399.0, 6399.0)),
            (Cell::from_row_col(0, 2), Point::new(-1.0, 10.0)),
            (Cell::from_row_col(0, 3), Point::new(10.0, 6400.0)),
            (Cell::from_row_col(0, 4), Point::new(f64::NAN, 10.0)),
        ];

        let window = CropWindow::new(6390..6400, 6390..6400)?;
        let rasterizer = ScatterRasterizer::new(RasterSize::with_rows_cols(1, 5), pixels, &options(canvas, window));
        let stats = rasterizer.stats();
        assert_eq!(stats.cells, 5);
        assert_eq!(stats.placed, 2);
        assert_eq!(stats.dropped, 3);
        assert_eq!(stats.outside_window, 1);

        let raster = rasterizer.rasterize_frame(&create_vec::<T>(&[1.0, 2.0, 3.0, 4.0, 5.0]))?;
        assert_eq!(raster[Cell::from_row_col(9, 9)], T::from_f64(2.0));
        assert_eq!(raster[Cell::from_row_col(8, 8)], T::from_f64(2.0));
        assert_eq!(raster.data_count(), 4);
        Ok(())
    }

    #[test]
    fn overlapping_splats_last_write_wins<T: RasterNum>() -> Result<()> {
        let canvas = RasterSize::square(6);
        let pixels = [
            (Cell::from_row_col(0, 0), Point::new(2.0, 2.0)),
            (Cell::from_row_col(0, 1), Point::new(3.0, 2.0)),
        ];
        let rasterizer = ScatterRasterizer::new(RasterSize::with_rows_cols(1, 2), pixels, &options(canvas, CropWindow::full(canvas)));
        let raster = rasterizer.rasterize_frame(&create_vec::<T>(&[1.0, 2.0]))?;

        assert_eq!(raster[Cell::from_row_col(2, 1)], T::from_f64(1.0));
        assert_eq!(raster[Cell::from_row_col(2, 2)], T::from_f64(2.0));
        assert_eq!(raster[Cell::from_row_col(2, 3)], T::from_f64(2.0));
        assert_eq!(raster[Cell::from_row_col(2, 4)], T::from_f64(2.0));
        Ok(())
    }

    #[test]
    fn window_equals_cropped_canvas<T: RasterNum>() -> Result<()> {
        let canvas = RasterSize::with_rows_cols(30, 40);
        let source_size = RasterSize::with_rows_cols(3, 4);
        let pixels: Vec<(Cell, Point)> = crate::CellIterator::for_raster_with_size(source_size)
            .map(|cell| (cell, Point::new(cell.col as f64 * 7.3 + 5.0, cell.row as f64 * 6.6 + 9.0)))
            .collect();
        let values: Vec<T> = (0..source_size.cell_count()).map(|v| T::from_f64(v as f64)).collect();

        let window = CropWindow::new(10..25, 8..30)?;
        let full = ScatterRasterizer::new(source_size, pixels.clone(), &options(canvas, CropWindow::full(canvas)));
        let cropped = ScatterRasterizer::new(source_size, pixels, &options(canvas, window));

        assert_eq!(full.rasterize_frame(&values)?.crop(&window)?, cropped.rasterize_frame(&values)?);
        Ok(())
    }

    #[test]
    fn frames_are_independent<T: RasterNum>() -> Result<()> {
        let canvas = RasterSize::square(8);
        let source_size = RasterSize::with_rows_cols(1, 2);
        let pixels = [
            (Cell::from_row_col(0, 0), Point::new(1.0, 1.0)),
            (Cell::from_row_col(0, 1), Point::new(5.0, 5.0)),
        ];
        let rasterizer = ScatterRasterizer::new(source_size, pixels, &options(canvas, CropWindow::full(canvas)));
        let field = ScalarField::new(2, 1, 2, create_vec::<T>(&[1.0, 2.0, NOD, 4.0]))?;

        let stack = rasterizer.rasterize("exp_pct", &field)?;
        assert_eq!(stack.shape(), (2, 8, 8));

        let first = stack.frame(0).expect("frame 0");
        let second = stack.frame(1).expect("frame 1");
        assert_eq!(first[Cell::from_row_col(1, 1)], T::from_f64(1.0));
        assert!(second[Cell::from_row_col(1, 1)].is_nan());
        assert_eq!(second[Cell::from_row_col(5, 5)], T::from_f64(4.0));
        assert_eq!(first.data_count(), 18);
        assert_eq!(second.data_count(), 9);

        assert_eq!(rasterizer.rasterize("exp_pct", &field)?, stack);
        Ok(())
    }

    #[test]
    fn field_shape_is_checked<T: RasterNum>() {
        let canvas = RasterSize::square(8);
        let rasterizer = ScatterRasterizer::new(RasterSize::with_rows_cols(1, 2), [], &options(canvas, CropWindow::full(canvas)));
        let field = ScalarField::<T>::from_2d(2, 1, create_vec(&[1.0, 2.0])).expect("field");
        assert!(matches!(rasterizer.rasterize("h", &field), Err(Error::ShapeMismatch { .. })));
        assert!(rasterizer.rasterize_frame::<T>(&create_vec(&[1.0])).is_err());
    }

    #[test]
    fn constant_splat<T: RasterNum>() {
        let canvas = RasterSize::square(4);
        let rasterizer = ScatterRasterizer::new(
            RasterSize::with_rows_cols(1, 1),
            [(Cell::from_row_col(0, 0), Point::new(3.0, 3.0))],
            &options(canvas, CropWindow::full(canvas)),
        );

        let raster = rasterizer.rasterize_constant(T::one());
        assert_eq!(raster.data_count(), 4);
        assert_eq!(raster[Cell::from_row_col(2, 2)], T::one());
    }

    #[instantiate_tests(<f32>)]
    mod pixel_f32 {}

    #[instantiate_tests(<f64>)]
    mod pixel_f64 {}
}
