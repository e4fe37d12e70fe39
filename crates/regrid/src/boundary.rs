//! The boundary contour of the area of interest, overlaid on every frame.

use crate::{CropWindow, Point, RotationTransform};

/// Order in which the stored contour points are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContourOrder {
    #[default]
    AsStored,
    Reversed,
}

/// Ordered polyline in local model meters (`bdr_dws`)
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryContour {
    points: Vec<Point>,
}

impl BoundaryContour {
    pub fn new(points: Vec<Point>) -> Self {
        BoundaryContour { points }
    }

    /// Contour from an `N x 2` array flattened in row-major order
    pub fn from_xy_pairs(xy: &[[f64; 2]]) -> Self {
        Self::new(xy.iter().map(|&[x, y]| Point::new(x, y)).collect())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }

    pub fn ordered(&self, order: ContourOrder) -> Vec<Point> {
        match order {
            ContourOrder::AsStored => self.points.clone(),
            ContourOrder::Reversed => self.points.iter().rev().copied().collect(),
        }
    }

    /// Rotate the contour with the dataset transform and move it into the frame of the cropped raster
    pub fn to_pixels(&self, transform: &RotationTransform, shift: BoundaryShift, order: ContourOrder) -> Vec<Point> {
        self.ordered(order)
            .into_iter()
            .map(|p| shift.apply(transform.to_pixel(p)))
            .collect()
    }
}

/// Pixel-space translation of the boundary, a property of the crop window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryShift {
    offset: Point,
}

impl BoundaryShift {
    pub fn new(dx: f64, dy: f64) -> Self {
        BoundaryShift {
            offset: Point::new(dx, dy),
        }
    }

    /// Shift to the crop window origin: `(-col_start, -row_start)`
    pub fn for_crop(crop: &CropWindow) -> Self {
        Self::new(-(crop.col_start as f64), -(crop.row_start as f64))
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn apply(&self, p: Point) -> Point {
        p + self.offset
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{Result, RigidRotation};

    fn contour() -> BoundaryContour {
        BoundaryContour::from_xy_pairs(&[[0.0, 0.0], [1000.0, 0.0], [1000.0, 500.0], [0.0, 0.0]])
    }

    #[test]
    fn reversed_order() {
        let reversed = contour().ordered(ContourOrder::Reversed);
        assert_eq!(reversed[1], Point::new(1000.0, 500.0));
        assert_eq!(reversed.len(), 4);
        assert!(contour().is_closed());
    }

    #[test]
    fn shift_for_crop() -> Result<()> {
        let shift = BoundaryShift::for_crop(&CropWindow::new(5400..6200, 1000..2200)?);
        assert_eq!(shift.apply(Point::new(1500.0, 5800.0)), Point::new(500.0, 400.0));
        Ok(())
    }

    #[test]
    fn contour_to_pixels() -> Result<()> {
        let rotation = RigidRotation::new(0.0, 100.0)?;
        let transform = RotationTransform::new(rotation, Point::new(0.0, 0.0), Point::new(1100.0, 5500.0));
        let shift = BoundaryShift::new(-1000.0, -5400.0);

        let pixels = contour().to_pixels(&transform, shift, ContourOrder::AsStored);
        assert_relative_eq!(pixels[0], Point::new(100.0, 100.0));
        assert_relative_eq!(pixels[2], Point::new(110.0, 105.0));

        let reversed = contour().to_pixels(&transform, shift, ContourOrder::Reversed);
        assert_relative_eq!(reversed[1], Point::new(110.0, 105.0));

        Ok(())
    }
}
