//! Rotated ocean-model output regridded onto north-aligned rasters with an aligned land mask.
//!
//! The implementation lives in the `regrid` workspace crate, this crate re-exports its public api.

pub use regrid::*;
