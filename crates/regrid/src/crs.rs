//! Coordinate reference system identifiers.

/// EPSG code of a coordinate reference system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Epsg(u16);

impl Epsg {
    pub const fn new(code: u16) -> Self {
        Epsg(code)
    }

    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Proj definition for codes where the bundled EPSG definition lacks the datum shift to WGS84
    pub fn proj_definition(&self) -> Option<&'static str> {
        match *self {
            epsg::RD_NEW => Some(RD_NEW_DEFINITION),
            _ => None,
        }
    }
}

const RD_NEW_DEFINITION: &str = "+proj=sterea +lat_0=52.1561605555556 +lon_0=5.38763888888889 +k=0.9999079 \
    +x_0=155000 +y_0=463000 +ellps=bessel \
    +towgs84=565.417,50.3319,465.552,-0.398957,0.343988,-1.8774,4.0725 +units=m +no_defs";

impl From<u16> for Epsg {
    fn from(code: u16) -> Self {
        Epsg(code)
    }
}

impl From<Epsg> for u16 {
    fn from(epsg: Epsg) -> Self {
        epsg.0
    }
}

impl std::fmt::Display for Epsg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

pub mod epsg {
    use super::Epsg;

    /// Geographic longitude/latitude on the WGS84 datum
    pub const WGS84: Epsg = Epsg::new(4326);
    /// Amersfoort / RD New, the Dutch national grid
    pub const RD_NEW: Epsg = Epsg::new(28992);
}
