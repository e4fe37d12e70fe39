#![warn(clippy::unwrap_used)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Regridding of rotated ocean-model output onto a north-aligned pixel raster.
//!
//! The pipeline projects a geodetic anchor to the local planar frame, rotates the model grid,
//! splats the scalar values of every valid cell onto a fixed canvas and composes a land mask
//! that shares the exact pixel alignment of the data raster.

pub type Result<T = ()> = std::result::Result<T, Error>;

pub mod axis;
pub mod boundary;
mod cell;
pub mod config;
pub mod crs;
mod denseraster;
mod error;
pub mod landmask;
mod nodata;
pub mod pipeline;
pub mod placement;
pub mod projection;
pub mod rasterizer;
mod rastersize;
pub mod rotation;
pub mod sourcegrid;
pub mod timewindow;
mod window;

#[cfg(test)]
mod testutils;

pub type Point<T = f64> = geo_types::Point<T>;

#[doc(inline)]
pub use boundary::{BoundaryContour, ContourOrder};
#[doc(inline)]
pub use cell::{Cell, CellIterator};
#[doc(inline)]
pub use config::RegridConfig;
#[doc(inline)]
pub use denseraster::{DenseRaster, RasterStack};
#[doc(inline)]
pub use error::{Error, Stage};
#[doc(inline)]
pub use nodata::{Nodata, RasterNum};
#[doc(inline)]
pub use pipeline::{Product, RegridOutput, RegridPipeline, RenderRequest};
#[doc(inline)]
pub use projection::{CoordinateTransformer, GeodeticAnchor, GeodeticProjector};
#[doc(inline)]
pub use rastersize::RasterSize;
#[doc(inline)]
pub use rotation::{RigidRotation, RotationTransform};
#[doc(inline)]
pub use sourcegrid::{ScalarField, SourceGrid};
#[doc(inline)]
pub use timewindow::{AggregationPeriod, FrameSelection};
#[doc(inline)]
pub use window::{CropWindow, PixelRect};
