//! Error types for mesh and texture synthesis.

use crate::texture::Channel;
use thiserror::Error;

/// Errors that can occur while building a terrain mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    /// The grid has more vertices than the index type can address.
    #[error("Grid of {vertices} vertices exceeds the {max}-vertex limit of {width} indices")]
    IndexOverflow {
        /// Vertices the grid would produce (width x height).
        vertices: usize,
        /// Maximum addressable vertices for the index width.
        max: usize,
        /// Index width that overflowed.
        width: crate::IndexWidth,
    },

    /// The elevation array does not cover the grid.
    #[error("Elevation array has {actual} samples, grid needs {expected}")]
    ShapeMismatch {
        /// width x height.
        expected: usize,
        /// Samples supplied.
        actual: usize,
    },
}

/// Errors that can occur while synthesizing a texture image.
#[derive(Debug, Error)]
pub enum TextureError {
    /// Channel arrays differ in length or do not cover width x height.
    #[error("{channel} channel has {actual} samples, expected {expected}")]
    ShapeMismatch {
        /// Offending channel.
        channel: Channel,
        /// Expected sample count.
        expected: usize,
        /// Actual sample count.
        actual: usize,
    },

    /// A sample cannot be represented as an 8-bit color component.
    #[error("{channel} sample {index} = {value} is outside the 8-bit range 0..=255")]
    ValueRange {
        /// Channel holding the sample.
        channel: Channel,
        /// Pixel index of the sample.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// PNG encoding failed.
    #[error("PNG encode error: {0}")]
    Encode(#[from] image::ImageError),

    /// I/O error writing an encoded image.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
