//! Conversion of pixel indices of the cropped raster to distances for the axis labels.

use crate::{Error, Result};

/// A linear scale from pixels to a distance unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pixels_per_unit: f64,
    unit: &'static str,
}

/// Axis tick at a pixel position
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub pixel: usize,
    pub label: String,
}

impl AxisScale {
    pub fn new(pixels_per_unit: f64, unit: &'static str) -> Result<Self> {
        if !pixels_per_unit.is_finite() || pixels_per_unit <= 0.0 {
            return Err(Error::InvalidArgument(format!(
                "Pixels per unit must be positive, got {pixels_per_unit}"
            )));
        }

        Ok(AxisScale { pixels_per_unit, unit })
    }

    /// 100 pixels = 10 km
    pub const fn kilometers() -> Self {
        AxisScale {
            pixels_per_unit: 10.0,
            unit: "km",
        }
    }

    pub fn unit(&self) -> &'static str {
        self.unit
    }

    pub fn to_units(&self, pixel: f64) -> f64 {
        pixel / self.pixels_per_unit
    }

    /// Ticks every `step_px` pixels from 0 up to and including `extent_px`
    pub fn ticks(&self, extent_px: usize, step_px: usize) -> Result<Vec<Tick>> {
        if step_px == 0 {
            return Err(Error::InvalidArgument("Tick step must be at least one pixel".into()));
        }

        Ok((0..=extent_px)
            .step_by(step_px)
            .map(|pixel| Tick {
                pixel,
                label: format!("{}", self.to_units(pixel as f64)),
            })
            .collect())
    }
}
