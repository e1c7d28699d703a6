//! # terrascope-raster
//!
//! GeoTIFF raster reading for the terrascope terrain pipeline.
//!
//! This crate provides functionality to:
//! - Decode a GeoTIFF byte buffer into a georeferenced [`Raster`] (dimensions,
//!   bounding box, one sample array per band)
//! - Pull the elevation band out of a DEM as an [`ElevationGrid`] without
//!   narrowing its native sample type
//! - Fetch raster bytes from a URL, a local file, or memory ([`RasterFetcher`])
//! - Encode a [`Raster`] back into a GeoTIFF ([`write_raster`])
//!
//! ## Georeferencing
//!
//! The bounding box comes from the ModelTiepoint + ModelPixelScale tags, or
//! from an unrotated ModelTransformation. Files with neither are rejected with
//! [`RasterError::MissingBoundingBox`].
//!
//! ## Example
//!
//! ```no_run
//! use terrascope_raster::{read_raster_file, ElevationGrid, DEFAULT_ELEVATION_BAND};
//!
//! let raster = read_raster_file("assets/dem.tif")?;
//! println!("{:?} {}x{}", raster.bounding_box(), raster.width(), raster.height());
//!
//! let grid = ElevationGrid::from_raster(raster, DEFAULT_ELEVATION_BAND)?;
//! println!("height at origin: {:?}", grid.height_at(0, 0));
//! # Ok::<(), terrascope_raster::RasterError>(())
//! ```

mod elevation;
mod error;
mod raster;
mod reader;
mod source;
mod writer;

pub use elevation::{ElevationGrid, DEFAULT_ELEVATION_BAND};
pub use error::RasterError;
pub use raster::{BoundingBox, Raster, SampleType, Samples};
pub use reader::{read_raster, read_raster_file};
pub use source::{RasterFetcher, RasterSource, DEFAULT_FETCH_TIMEOUT};
pub use writer::write_raster;

/// Result type for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;
