//! Land overlay that shares the pixel alignment of the data rasters.

use crate::rasterizer::ScatterRasterizer;
use crate::{DenseRaster, Error, PixelRect, RasterNum, Result, Stage};

pub const LAND: f64 = 1.0;

/// Composes the land mask from the rasterized land cells and the fixed land patches of the configuration.
///
/// The result holds [`LAND`] on land and NaN elsewhere. Pixels that carry data in the first frame of the data
/// raster are never marked as land: observed data takes precedence over the coarse land approximation.
#[derive(Debug, Clone)]
pub struct LandMaskCompositor {
    land: ScatterRasterizer,
    patches: Vec<PixelRect>,
}

impl LandMaskCompositor {
    pub fn new(land: ScatterRasterizer, patches: Vec<PixelRect>) -> Result<Self> {
        let size = land.output_size();
        if let Some(patch) = patches.iter().find(|patch| !patch.fits_in(size)) {
            return Err(Error::geometry(
                Stage::Masking,
                format!("Land patch {patch:?} does not fit in the land mask {size}"),
            ));
        }

        Ok(LandMaskCompositor { land, patches })
    }

    /// The land mask before the data override is applied
    pub fn static_mask<T: RasterNum>(&self) -> DenseRaster<T> {
        let mut mask = self.land.rasterize_constant(T::from_f64(LAND));
        for patch in &self.patches {
            mask.fill_rect(patch, T::from_f64(LAND));
        }

        mask
    }

    pub fn compose<T: RasterNum>(&self, data_frame0: &DenseRaster<T>) -> Result<DenseRaster<T>> {
        let mut mask = self.static_mask::<T>();
        if mask.size() != data_frame0.size() {
            return Err(Error::geometry(
                Stage::Masking,
                format!(
                    "Data raster {} is not aligned with the land mask {}",
                    data_frame0.size(),
                    mask.size()
                ),
            ));
        }

        let mut overridden = 0;
        for (land, data) in mask.as_mut_slice().iter_mut().zip(data_frame0.iter()) {
            if !data.is_nodata() && !land.is_nodata() {
                *land = T::NODATA;
                overridden += 1;
            }
        }

        log::debug!("{overridden} land pixels overridden by data");
        Ok(mask)
    }
}
