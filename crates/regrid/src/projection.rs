//! Projection of the geodetic anchor to the local planar frame of the model.

use proj4rs::Proj;
use proj4rs::transform::transform;

use crate::crs::Epsg;
use crate::{Error, Point, Result, Stage};

pub struct CoordinateTransformer {
    source: Proj,
    target: Proj,
    source_epsg: Epsg,
    target_epsg: Epsg,
}

impl CoordinateTransformer {
    pub fn from_epsg(source_epsg: Epsg, target_epsg: Epsg) -> Result<Self> {
        let source = proj_from_epsg(source_epsg)?;
        let target = proj_from_epsg(target_epsg)?;

        Ok(CoordinateTransformer {
            source,
            target,
            source_epsg,
            target_epsg,
        })
    }

    /// Transform a point, geographic coordinates are passed and returned in degrees as (x=lon, y=lat).
    pub fn transform_point(&self, point: Point) -> Result<Point> {
        let mut p = if self.source.is_latlong() { point.to_radians() } else { point };
        transform(&self.source, &self.target, &mut p)?;
        if self.target.is_latlong() {
            p = p.to_degrees();
        }

        Ok(p)
    }

    pub fn transform_points_in_place(&self, points: &mut [Point]) -> Result<()> {
        for point in points.iter_mut() {
            *point = self.transform_point(*point)?;
        }
        Ok(())
    }

    pub fn source_epsg(&self) -> Epsg {
        self.source_epsg
    }

    pub fn target_epsg(&self) -> Epsg {
        self.target_epsg
    }
}

fn proj_from_epsg(epsg: Epsg) -> Result<Proj> {
    match epsg.proj_definition() {
        Some(definition) => Ok(Proj::from_proj_string(definition)?),
        None => Ok(Proj::from_epsg_code(epsg.into())?),
    }
}

/// Reference longitude/latitude points of a dataset, the first one fixes the origin of the planar frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GeodeticAnchor {
    points: Vec<Point>,
}

impl GeodeticAnchor {
    /// Points are (x=lon, y=lat) in degrees.
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::geometry(Stage::Projection, "Geodetic anchor contains no points"));
        }

        if let Some((index, p)) = points.iter().enumerate().find(|(_, p)| !is_valid_lon_lat(p)) {
            return Err(Error::geometry(
                Stage::Projection,
                format!("Anchor point {index} (lon: {}, lat: {}) is outside the valid geodetic range", p.x(), p.y()),
            ));
        }

        Ok(GeodeticAnchor { points })
    }

    pub fn single(lon: f64, lat: f64) -> Result<Self> {
        Self::new(vec![Point::new(lon, lat)])
    }

    /// Anchor from separate longitude and latitude arrays (`lonc`, `latc`), flattened in row-major order.
    pub fn from_lon_lat(lon: &[f64], lat: &[f64]) -> Result<Self> {
        if lon.len() != lat.len() {
            return Err(Error::geometry(
                Stage::Projection,
                format!("Longitude ({}) and latitude ({}) counts differ", lon.len(), lat.len()),
            ));
        }

        Self::new(lon.iter().zip(lat).map(|(&x, &y)| Point::new(x, y)).collect())
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

fn is_valid_lon_lat(p: &Point) -> bool {
    p.x().is_finite() && p.y().is_finite() && (-180.0..=180.0).contains(&p.x()) && (-90.0..=90.0).contains(&p.y())
}

/// Anchor points in the planar frame, already divided by the unit divisor.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedAnchor {
    points: Vec<Point>,
}

impl ProjectedAnchor {
    /// The origin correction `(x0, y0)`
    pub fn origin(&self) -> Point {
        self.points[0]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }
}

pub struct GeodeticProjector {
    transformer: CoordinateTransformer,
    divisor: f64,
}

impl GeodeticProjector {
    pub fn new(source: Epsg, target: Epsg, divisor: f64) -> Result<Self> {
        if !divisor.is_finite() || divisor <= 0.0 {
            return Err(Error::InvalidConfiguration(format!("Unit divisor must be positive, got {divisor}")));
        }

        Ok(GeodeticProjector {
            transformer: CoordinateTransformer::from_epsg(source, target)?,
            divisor,
        })
    }

    pub fn project(&self, anchor: &GeodeticAnchor) -> Result<ProjectedAnchor> {
        let mut points = anchor.points().to_vec();
        self.transformer.transform_points_in_place(&mut points)?;

        if let Some(p) = points.iter().find(|p| !p.x().is_finite() || !p.y().is_finite()) {
            return Err(Error::geometry(
                Stage::Projection,
                format!("Projection to {} produced a non finite coordinate {:?}", self.transformer.target_epsg(), p),
            ));
        }

        let points: Vec<Point> = points.into_iter().map(|p| p / self.divisor).collect();
        log::debug!(
            "Projected anchor origin {} -> ({:.3}, {:.3})",
            self.transformer.target_epsg(),
            points[0].x(),
            points[0].y()
        );

        Ok(ProjectedAnchor { points })
    }
}
