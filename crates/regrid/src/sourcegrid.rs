//! The irregular, rotated model grid and the scalar fields defined on it.

use std::collections::BTreeMap;

use crate::{Cell, CellIterator, Error, FrameSelection, Point, RasterNum, RasterSize, Result};

/// Scalar values of a `(time, y, x)` field stored frame by frame in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField<T: RasterNum = f64> {
    frames: usize,
    size: RasterSize,
    data: Vec<T>,
}

impl<T: RasterNum> ScalarField<T> {
    pub fn new(frames: usize, rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        let size = RasterSize::with_rows_cols(rows, cols);
        if data.len() != frames * size.cell_count() {
            return Err(Error::InvalidArgument(format!(
                "Field of {frames} frames of size {size} requires {} values, got {}",
                frames * size.cell_count(),
                data.len()
            )));
        }

        Ok(ScalarField { frames, size, data })
    }

    /// A field without time axis, treated as a single frame
    pub fn from_2d(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        Self::new(1, rows, cols, data)
    }

    /// Replace the fill value used by the file format with NaN
    pub fn with_fill_value(mut self, fill: T) -> Self {
        self.data.iter_mut().for_each(|v| v.init_nodata(fill));
        self
    }

    pub fn size(&self) -> RasterSize {
        self.size
    }

    pub fn frame_count(&self) -> usize {
        self.frames
    }

    pub fn frame(&self, frame: usize) -> &[T] {
        let count = self.size.cell_count();
        &self.data[frame * count..(frame + 1) * count]
    }

    pub fn value(&self, frame: usize, cell: Cell) -> T {
        self.frame(frame)[cell.index_in_raster(self.size.cols)]
    }

    /// Field containing only the selected frames, in selection order
    pub fn select(&self, selection: &FrameSelection) -> Result<Self> {
        if selection.is_empty() {
            return Err(Error::EmptyWindow("the frame selection contains no frames".into()));
        }

        if let Some(&index) = selection.indices().iter().find(|&&index| index >= self.frames) {
            return Err(Error::InvalidArgument(format!(
                "Frame index {index} out of range for a field with {} frames",
                self.frames
            )));
        }

        let mut data = Vec::with_capacity(selection.len() * self.size.cell_count());
        for &index in selection.indices() {
            data.extend_from_slice(self.frame(index));
        }

        ScalarField::new(selection.len(), self.size.rows, self.size.cols, data)
    }
}

/// Model grid described by the 1-D coordinate vectors `xc` and `yc` (local model meters).
///
/// The implicit mesh has `len(yc)` rows and `len(xc)` columns. Every mask and field attached to the grid
/// is validated against that shape.
#[derive(Debug, Clone)]
pub struct SourceGrid<T: RasterNum = f64> {
    xc: Vec<f64>,
    yc: Vec<f64>,
    valid: Vec<bool>,
    land: Vec<bool>,
    fields: BTreeMap<String, ScalarField<T>>,
}

impl<T: RasterNum> SourceGrid<T> {
    /// Grid where every cell is valid and no cell is land
    pub fn new(xc: Vec<f64>, yc: Vec<f64>) -> Result<Self> {
        if xc.is_empty() || yc.is_empty() {
            return Err(Error::InvalidArgument("Grid coordinate vectors must not be empty".into()));
        }

        if xc.iter().chain(yc.iter()).any(|v| !v.is_finite()) {
            return Err(Error::InvalidArgument("Grid coordinates must be finite".into()));
        }

        let cell_count = xc.len() * yc.len();
        Ok(SourceGrid {
            xc,
            yc,
            valid: vec![true; cell_count],
            land: vec![false; cell_count],
            fields: BTreeMap::new(),
        })
    }

    /// Cells flagged `true` carry data (`mask_dws`)
    pub fn with_validity_mask(mut self, mask: Vec<bool>) -> Result<Self> {
        self.check_len("validity mask", mask.len())?;
        self.valid = mask;
        Ok(self)
    }

    /// Cells flagged `true` are land
    pub fn with_land_mask(mut self, mask: Vec<bool>) -> Result<Self> {
        self.check_len("land mask", mask.len())?;
        self.land = mask;
        Ok(self)
    }

    /// Derive the land mask from a bathymetry array where land is NaN
    pub fn with_bathymetry(self, h: &[T]) -> Result<Self> {
        let land = h.iter().map(|v| v.is_nodata()).collect();
        self.with_land_mask(land)
    }

    pub fn with_field(mut self, name: impl Into<String>, field: ScalarField<T>) -> Result<Self> {
        let name = name.into();
        if field.size() != self.size() {
            return Err(Error::ShapeMismatch {
                field: name,
                expected: self.size(),
                actual: field.size(),
            });
        }

        self.fields.insert(name, field);
        Ok(self)
    }

    fn check_len(&self, name: &str, len: usize) -> Result<()> {
        if len != self.size().cell_count() {
            return Err(Error::ShapeMismatch {
                field: name.to_string(),
                expected: self.size(),
                actual: RasterSize::with_rows_cols(1, len),
            });
        }

        Ok(())
    }

    /// `(len(yc), len(xc))`
    pub fn size(&self) -> RasterSize {
        RasterSize::with_rows_cols(self.yc.len(), self.xc.len())
    }

    pub fn xc(&self) -> &[f64] {
        &self.xc
    }

    pub fn yc(&self) -> &[f64] {
        &self.yc
    }

    pub fn mesh_point(&self, cell: Cell) -> Point {
        Point::new(self.xc[cell.col], self.yc[cell.row])
    }

    pub fn first_mesh_point(&self) -> Point {
        self.mesh_point(Cell::from_row_col(0, 0))
    }

    pub fn is_valid(&self, cell: Cell) -> bool {
        self.valid[cell.index_in_raster(self.xc.len())]
    }

    pub fn is_land(&self, cell: Cell) -> bool {
        self.land[cell.index_in_raster(self.xc.len())]
    }

    /// Cells that carry data, in row-major order
    pub fn valid_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        CellIterator::for_raster_with_size(self.size()).filter(|&cell| self.is_valid(cell))
    }

    /// Land cells, in row-major order
    pub fn land_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        CellIterator::for_raster_with_size(self.size()).filter(|&cell| self.is_land(cell))
    }

    pub fn field(&self, name: &str) -> Result<&ScalarField<T>> {
        self.fields.get(name).ok_or_else(|| Error::MissingField(name.to_string()))
    }
}
