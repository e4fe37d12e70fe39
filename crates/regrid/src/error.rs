use thiserror::Error;

use crate::RasterSize;

/// The pipeline stage in which an error originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    Selection,
    Projection,
    Rotation,
    Rasterization,
    Masking,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Configuration => "configuration",
            Stage::Selection => "time selection",
            Stage::Projection => "projection",
            Stage::Rotation => "rotation",
            Stage::Rasterization => "rasterization",
            Stage::Masking => "masking",
        };

        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Geometry error during {stage}: {message}")]
    Geometry { stage: Stage, message: String },
    #[error("Shape of '{field}' does not match the grid: expected {expected}, got {actual}")]
    ShapeMismatch {
        field: String,
        expected: RasterSize,
        actual: RasterSize,
    },
    #[error("Empty time window: {0}")]
    EmptyWindow(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Proj4rs error: {0}")]
    Proj4rs(#[from] proj4rs::errors::Error),
}

impl Error {
    pub fn geometry(stage: Stage, message: impl Into<String>) -> Self {
        Error::Geometry {
            stage,
            message: message.into(),
        }
    }

    /// The stage of the pipeline that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            Error::Geometry { stage, .. } => *stage,
            Error::ShapeMismatch { .. } | Error::MissingField(_) => Stage::Rasterization,
            Error::EmptyWindow(_) => Stage::Selection,
            Error::InvalidConfiguration(_) | Error::InvalidArgument(_) => Stage::Configuration,
            Error::Proj4rs(_) => Stage::Projection,
        }
    }
}
