use crate::{Cell, CropWindow, Error, PixelRect, RasterNum, RasterSize, Result};

/// Raster implementation using a dense data structure.
/// The nodata values are stored as [`crate::Nodata::NODATA`] for the type T in the same array data structure
/// So no additional data is allocated for tracking nodata cells.
#[derive(Debug, Clone)]
pub struct DenseRaster<T: RasterNum = f64> {
    size: RasterSize,
    data: Vec<T>,
}

impl<T: RasterNum> DenseRaster<T> {
    pub fn new(size: RasterSize, data: Vec<T>) -> Result<Self> {
        if data.len() != size.cell_count() {
            return Err(Error::InvalidArgument(format!(
                "Raster of size {size} requires {} values, got {}",
                size.cell_count(),
                data.len()
            )));
        }

        Ok(DenseRaster { size, data })
    }

    pub fn filled_with(val: T, size: RasterSize) -> Self {
        DenseRaster {
            size,
            data: vec![val; size.cell_count()],
        }
    }

    pub fn filled_with_nodata(size: RasterSize) -> Self {
        Self::filled_with(T::NODATA, size)
    }

    pub fn size(&self) -> RasterSize {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.cols
    }

    pub fn height(&self) -> usize {
        self.size.rows
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn row_slice(&self, row: usize) -> &[T] {
        let start = row * self.size.cols;
        &self.data[start..start + self.size.cols]
    }

    pub fn cell_value(&self, cell: Cell) -> Option<T> {
        let val = self.data[cell.index_in_raster(self.size.cols)];
        if val.is_nodata() { None } else { Some(val) }
    }

    pub fn nodata_count(&self) -> usize {
        self.data.iter().filter(|x| x.is_nodata()).count()
    }

    pub fn data_count(&self) -> usize {
        self.len() - self.nodata_count()
    }

    pub fn contains_data(&self) -> bool {
        self.data.iter().any(|x| !x.is_nodata())
    }

    /// Assign `val` to every pixel inside the rectangle.
    pub fn fill_rect(&mut self, rect: &PixelRect, val: T) {
        let cols = self.size.cols;
        for row in rect.rows() {
            self.data[row * cols + rect.col_start..row * cols + rect.col_end].fill(val);
        }
    }

    /// Copy of the pixels inside the window, the window must lie within the raster.
    pub fn crop(&self, window: &CropWindow) -> Result<Self> {
        if !window.fits_in(self.size) {
            return Err(Error::InvalidArgument(format!(
                "Crop window {window} does not fit in raster of size {}",
                self.size
            )));
        }

        let mut data = Vec::with_capacity(window.size().cell_count());
        for row in window.rows() {
            data.extend_from_slice(&self.row_slice(row)[window.cols()]);
        }

        DenseRaster::new(window.size(), data)
    }
}

impl<T: RasterNum> PartialEq for DenseRaster<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size {
            return false;
        }

        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(&a, &b)| match (a.is_nodata(), b.is_nodata()) {
                (true, true) => true,
                (false, false) => a == b,
                _ => false,
            })
    }
}

impl<T: RasterNum> std::ops::Index<Cell> for DenseRaster<T> {
    type Output = T;

    fn index(&self, cell: Cell) -> &Self::Output {
        &self.data[cell.index_in_raster(self.size.cols)]
    }
}

impl<T: RasterNum> std::ops::IndexMut<Cell> for DenseRaster<T> {
    fn index_mut(&mut self, cell: Cell) -> &mut Self::Output {
        let cols = self.size.cols;
        &mut self.data[cell.index_in_raster(cols)]
    }
}

/// A `(T, H, W)` stack of equally sized rasters, one per retained time frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterStack<T: RasterNum = f64> {
    size: RasterSize,
    frames: Vec<DenseRaster<T>>,
}

impl<T: RasterNum> RasterStack<T> {
    pub fn filled_with_nodata(frame_count: usize, size: RasterSize) -> Self {
        RasterStack {
            size,
            frames: (0..frame_count).map(|_| DenseRaster::filled_with_nodata(size)).collect(),
        }
    }

    pub fn from_frames(size: RasterSize, frames: Vec<DenseRaster<T>>) -> Result<Self> {
        if let Some(frame) = frames.iter().find(|frame| frame.size() != size) {
            return Err(Error::InvalidArgument(format!(
                "Frame of size {} does not match stack size {size}",
                frame.size()
            )));
        }

        Ok(RasterStack { size, frames })
    }

    /// Size of a single frame
    pub fn frame_size(&self) -> RasterSize {
        self.size
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// `(T, H, W)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.frames.len(), self.size.rows, self.size.cols)
    }

    pub fn frame(&self, index: usize) -> Option<&DenseRaster<T>> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[DenseRaster<T>] {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut [DenseRaster<T>] {
        &mut self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{NOD, compare_fp_vectors};

    #[test]
    fn new_checks_length() {
        assert!(DenseRaster::<f64>::new(RasterSize::with_rows_cols(2, 2), vec![1.0; 3]).is_err());
        assert!(DenseRaster::<f64>::new(RasterSize::with_rows_cols(2, 2), vec![1.0; 4]).is_ok());
    }

    #[test]
    fn nodata_aware_equality() -> Result<()> {
        let size = RasterSize::with_rows_cols(1, 3);
        let a = DenseRaster::new(size, vec![1.0, NOD, 3.0])?;
        let b = DenseRaster::new(size, vec![1.0, NOD, 3.0])?;
        let c = DenseRaster::new(size, vec![1.0, 0.0, 3.0])?;

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.nodata_count(), 1);
        assert_eq!(a.data_count(), 2);
        assert_eq!(a.cell_value(Cell::from_row_col(0, 1)), None);
        assert_eq!(a.cell_value(Cell::from_row_col(0, 2)), Some(3.0));

        Ok(())
    }

    #[test]
    fn crop_copies_window() -> Result<()> {
        let size = RasterSize::with_rows_cols(4, 5);
        #[rustfmt::skip]
        let raster = DenseRaster::new(size, vec![
             0.0,  1.0,  2.0,  3.0,  4.0,
             5.0,  6.0,  7.0,  8.0,  9.0,
            10.0, 11.0, 12.0, 13.0, 14.0,
            15.0, 16.0, 17.0, 18.0, 19.0,
        ])?;

        let cropped = raster.crop(&CropWindow::new(1..3, 2..5)?)?;
        assert_eq!(cropped.size(), RasterSize::with_rows_cols(2, 3));
        assert!(compare_fp_vectors(cropped.as_slice(), &[7.0, 8.0, 9.0, 12.0, 13.0, 14.0]));

        assert!(raster.crop(&CropWindow::new(0..5, 0..5)?).is_err());

        Ok(())
    }

    #[test]
    fn fill_rect() {
        let mut raster = DenseRaster::<f32>::filled_with_nodata(RasterSize::with_rows_cols(3, 3));
        raster.fill_rect(&PixelRect::new(1..3, 0..2), 1.0);
        assert_eq!(raster.data_count(), 4);
        assert_eq!(raster[Cell::from_row_col(2, 1)], 1.0);
        assert!(raster[Cell::from_row_col(0, 0)].is_nan());
    }

    #[test]
    fn stack_rejects_mismatched_frames() {
        let size = RasterSize::with_rows_cols(2, 2);
        let frames = vec![
            DenseRaster::<f64>::filled_with_nodata(size),
            DenseRaster::<f64>::filled_with_nodata(RasterSize::with_rows_cols(2, 3)),
        ];
        assert!(RasterStack::from_frames(size, frames).is_err());

        let stack = RasterStack::<f64>::filled_with_nodata(3, size);
        assert_eq!(stack.shape(), (3, 2, 2));
    }
}
