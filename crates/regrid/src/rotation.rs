//! Rigid rotation of planar model coordinates into the north-aligned pixel frame.

use crate::projection::ProjectedAnchor;
use crate::{Error, Point, Result, Stage};

/// Rotation by a fixed angle followed by a division that converts the unit (meters to pixels).
///
/// The rotation matrix is `[[cos θ, sin θ], [-sin θ, cos θ]]`, so a point is mapped to `R · p / divisor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigidRotation {
    angle_deg: f64,
    divisor: f64,
    cos: f64,
    sin: f64,
}

impl RigidRotation {
    pub fn new(angle_deg: f64, divisor: f64) -> Result<Self> {
        if !angle_deg.is_finite() {
            return Err(Error::geometry(Stage::Rotation, format!("Rotation angle {angle_deg} is not finite")));
        }

        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(Error::geometry(Stage::Rotation, format!("Unit divisor must be positive, got {divisor}")));
        }

        let (sin, cos) = angle_deg.to_radians().sin_cos();
        Ok(RigidRotation {
            angle_deg,
            divisor,
            cos,
            sin,
        })
    }

    pub fn angle_deg(&self) -> f64 {
        self.angle_deg
    }

    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    /// The 2x2 rotation matrix in row-major order
    pub fn matrix(&self) -> [[f64; 2]; 2] {
        [[self.cos, self.sin], [-self.sin, self.cos]]
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            (self.cos * p.x() + self.sin * p.y()) / self.divisor,
            (-self.sin * p.x() + self.cos * p.y()) / self.divisor,
        )
    }

    pub fn apply_all(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|&p| self.apply(p)).collect()
    }

    /// Rotation that undoes this one, including the unit conversion
    pub fn inverse(&self) -> Self {
        RigidRotation {
            angle_deg: -self.angle_deg,
            divisor: 1.0 / self.divisor,
            cos: self.cos,
            sin: -self.sin,
        }
    }
}

/// The complete mapping of model coordinates to canvas pixel coordinates for one dataset.
///
/// `to_pixel(p) = R · p / divisor - grid_origin + origin` where `grid_origin` is the rotated first mesh point
/// and `origin` the projected anchor. The same instance is used for the grid cells, the land cells and the
/// boundary contour of a dataset so they stay aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTransform {
    rotation: RigidRotation,
    grid_origin: Point,
    origin: Point,
}

impl RotationTransform {
    pub fn new(rotation: RigidRotation, grid_origin: Point, origin: Point) -> Self {
        RotationTransform {
            rotation,
            grid_origin,
            origin,
        }
    }

    /// Derive the offsets from the first point of the model mesh and the projected anchor.
    pub fn for_grid(rotation: RigidRotation, first_mesh_point: Point, anchor: &ProjectedAnchor) -> Self {
        Self::new(rotation, rotation.apply(first_mesh_point), anchor.origin())
    }

    pub fn rotation(&self) -> &RigidRotation {
        &self.rotation
    }

    pub fn grid_origin(&self) -> Point {
        self.grid_origin
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Canvas pixel coordinate (x = column, y = row) of a model point
    #[inline]
    pub fn to_pixel(&self, p: Point) -> Point {
        self.rotation.apply(p) - self.grid_origin + self.origin
    }

    pub fn to_pixels(&self, points: &[Point]) -> Vec<Point> {
        points.iter().map(|&p| self.to_pixel(p)).collect()
    }
}
