use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImstatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid FITS file: {0}")]
    InvalidFits(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Cannot open image {path:?}: {reason}")]
    OpenImage { path: PathBuf, reason: String },

    #[error("Invalid region {region:?}: {reason}")]
    RegionSyntax { region: String, reason: String },

    #[error(
        "Region [{x_min}:{x_max},{y_min}:{y_max}] is empty or exceeds image dimensions {width}x{height}"
    )]
    RegionOutOfRange {
        x_min: usize,
        x_max: usize,
        y_min: usize,
        y_max: usize,
        width: usize,
        height: usize,
    },

    #[error("Degenerate histogram binning: bin width {bin_width} (stddev {stddev})")]
    DegenerateBinning { bin_width: f64, stddev: f64 },

    #[error("Unknown format option {0:?} (expected yes or no)")]
    UnknownFormat(String),

    #[error("Unknown return type {0:?} (expected str, arr, or dict)")]
    UnknownReturnType(String),

    #[error("Image format error: {0}")]
    ImageFormat(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ImstatError>;
