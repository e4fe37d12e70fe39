//! Named, validated configuration of the regridding pipeline.
//!
//! The constants tie the rotation of one specific model grid to a fixed canvas: the canvas has to be large
//! enough to contain the rotated grid in pixel units and the crop window selects the area of interest.

use bon::bon;

use crate::boundary::BoundaryShift;
use crate::crs::{Epsg, epsg};
use crate::placement::IndexedPlacement;
use crate::rasterizer::PixelSnap;
use crate::{CropWindow, Error, PixelRect, RasterSize, Result};

pub const DEFAULT_CANVAS: RasterSize = RasterSize::square(6400);
pub const DEFAULT_ROTATION_DEG: f64 = -17.0;
pub const DEFAULT_UNIT_DIVISOR: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegridConfig {
    canvas: RasterSize,
    crop: CropWindow,
    splat_radius: usize,
    snap: PixelSnap,
    rotation_deg: f64,
    unit_divisor: f64,
    land_patches: Vec<PixelRect>,
    source_crs: Epsg,
    target_crs: Epsg,
    placement: IndexedPlacement,
}

#[bon]
impl RegridConfig {
    #[builder]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        #[builder(default = DEFAULT_CANVAS)] canvas: RasterSize,
        crop: CropWindow,
        #[builder(default = 1)] splat_radius: usize,
        #[builder(default)] snap: PixelSnap,
        #[builder(default = DEFAULT_ROTATION_DEG)] rotation_deg: f64,
        #[builder(default = DEFAULT_UNIT_DIVISOR)] unit_divisor: f64,
        #[builder(default)] land_patches: Vec<PixelRect>,
        #[builder(default = epsg::WGS84)] source_crs: Epsg,
        #[builder(default = epsg::RD_NEW)] target_crs: Epsg,
        placement: Option<IndexedPlacement>,
    ) -> Result<Self> {
        let config = RegridConfig {
            canvas,
            crop,
            splat_radius,
            snap,
            rotation_deg,
            unit_divisor,
            land_patches,
            source_crs,
            target_crs,
            placement: placement.unwrap_or_else(|| IndexedPlacement::for_output(crop.size())),
        };

        config.validate()?;
        Ok(config)
    }
}

impl RegridConfig {
    /// The constants used for the 200m Wadden Sea model output
    pub fn dws_200m() -> Result<Self> {
        RegridConfig::builder()
            .crop(CropWindow::new(5400..6200, 1000..2200)?)
            .land_patches(vec![PixelRect::new(0..300, 280..1200)])
            .placement(IndexedPlacement::dws_residence_time())
            .build()
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas.is_empty() {
            return Err(Error::InvalidConfiguration(format!("Canvas {} is empty", self.canvas)));
        }

        if self.crop.size().is_empty() || !self.crop.fits_in(self.canvas) {
            return Err(Error::InvalidConfiguration(format!(
                "Crop window {} does not fit in canvas {}",
                self.crop, self.canvas
            )));
        }

        let crop_size = self.crop.size();
        if let Some(patch) = self.land_patches.iter().find(|patch| patch.is_empty() || !patch.fits_in(crop_size)) {
            return Err(Error::InvalidConfiguration(format!(
                "Land patch {patch:?} does not fit in the cropped raster {crop_size}"
            )));
        }

        if !self.rotation_deg.is_finite() {
            return Err(Error::InvalidConfiguration(format!("Rotation angle {} is not finite", self.rotation_deg)));
        }

        if !self.unit_divisor.is_finite() || self.unit_divisor <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "Unit divisor must be positive, got {}",
                self.unit_divisor
            )));
        }

        if self.placement.output_size() != crop_size {
            return Err(Error::InvalidConfiguration(format!(
                "Indexed placement output {} must match the cropped raster {crop_size}",
                self.placement.output_size()
            )));
        }

        self.placement.validate()
    }

    pub fn canvas(&self) -> RasterSize {
        self.canvas
    }

    pub fn crop(&self) -> &CropWindow {
        &self.crop
    }

    pub fn splat_radius(&self) -> usize {
        self.splat_radius
    }

    pub fn snap(&self) -> PixelSnap {
        self.snap
    }

    pub fn rotation_deg(&self) -> f64 {
        self.rotation_deg
    }

    pub fn unit_divisor(&self) -> f64 {
        self.unit_divisor
    }

    pub fn land_patches(&self) -> &[PixelRect] {
        &self.land_patches
    }

    pub fn source_crs(&self) -> Epsg {
        self.source_crs
    }

    pub fn target_crs(&self) -> Epsg {
        self.target_crs
    }

    pub fn placement(&self) -> &IndexedPlacement {
        &self.placement
    }

    /// Translation that moves canvas pixels into the frame of the cropped raster
    pub fn boundary_shift(&self) -> BoundaryShift {
        BoundaryShift::for_crop(&self.crop)
    }
}
