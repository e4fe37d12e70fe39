use num::Float;

/// Trait for pixel types that can represent a no-data value.
/// Pixels that were never written by the rasterizer hold the no-data value, which is NaN for
/// the floating point types used in this crate, so "no data" stays distinguishable from zero.
pub trait Nodata: PartialEq + Sized + Copy {
    const NODATA: Self;

    fn is_nodata(self) -> bool;

    /// For importing foreign data that may contain nodata values not adhering to `Self::NODATA`.
    fn init_nodata(&mut self, nodata: Self) {
        if *self == nodata {
            *self = Self::NODATA;
        }
    }
}

macro_rules! impl_nodata_floating_point {
    ( $t:ident ) => {
        impl Nodata for $t {
            const NODATA: $t = $t::NAN;

            #[inline]
            fn is_nodata(self) -> bool {
                self.is_nan()
            }
        }
    };
}

impl_nodata_floating_point!(f32);
impl_nodata_floating_point!(f64);

/// Pixel value types supported by the rasters.
pub trait RasterNum: Float + Nodata + Send + Sync + std::fmt::Debug + 'static {
    fn from_f64(val: f64) -> Self;
}

impl RasterNum for f32 {
    fn from_f64(val: f64) -> Self {
        val as f32
    }
}

impl RasterNum for f64 {
    fn from_f64(val: f64) -> Self {
        val
    }
}
