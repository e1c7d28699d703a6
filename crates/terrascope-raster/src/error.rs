//! Error types for the raster crate.

use thiserror::Error;

/// Errors that can occur when reading or fetching raster data.
#[derive(Debug, Error)]
pub enum RasterError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding error.
    #[error("TIFF decode error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// Invalid GeoTIFF - the container decoded but its contents are unusable.
    #[error("Invalid GeoTIFF: {0}")]
    InvalidGeoTiff(String),

    /// Neither ModelTiepoint/ModelPixelScale nor ModelTransformation is present.
    #[error("GeoTIFF has no georeferencing tags; cannot derive a bounding box")]
    MissingBoundingBox,

    /// Requested band does not exist in the raster.
    #[error("Band index {index} out of range (raster has {count} band(s))")]
    BandOutOfRange {
        /// Requested band index.
        index: usize,
        /// Number of bands in the raster.
        count: usize,
    },

    /// A band's sample count does not match width x height.
    #[error("Band {band} has {actual} samples, expected {expected}")]
    BandLength {
        /// Offending band index.
        band: usize,
        /// Expected number of samples (width x height).
        expected: usize,
        /// Actual number of samples.
        actual: usize,
    },

    /// Sample layout the reader cannot split into bands.
    #[error("Unsupported sample layout: {0}")]
    UnsupportedLayout(String),

    /// HTTP request error when fetching a raster.
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote server answered with a non-success status.
    #[error("Failed to fetch {url}: HTTP {status}")]
    FetchFailed {
        /// Resolved request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
}

impl RasterError {
    /// Whether this error means the bytes were malformed or unreadable as a
    /// georeferenced raster, as opposed to a transport failure getting them.
    pub fn is_decode_error(&self) -> bool {
        !matches!(
            self,
            RasterError::Io(_) | RasterError::Http(_) | RasterError::FetchFailed { .. }
        )
    }
}
