//! Error types for the terrain provider crate.

use thiserror::Error;

/// Errors that can occur when working with the terrain provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Operation belongs to tile streaming, which this provider does not do.
    #[error("{0} is not implemented by a static heightmap provider")]
    NotImplemented(&'static str),

    /// Heightmap buffer is too short for its declared dimensions.
    #[error("Heightmap buffer has {actual} elements, structure needs {expected}")]
    ShapeMismatch {
        /// Elements required by width, height, and structure.
        expected: usize,
        /// Elements supplied.
        actual: usize,
    },

    /// Tile coordinates do not exist at the requested level.
    #[error("Tile x={x} y={y} does not exist at level {level}")]
    InvalidTile {
        /// X coordinate (column).
        x: u32,
        /// Y coordinate (row).
        y: u32,
        /// Level.
        level: u32,
    },

    /// Level too deep to count tiles in 32 bits.
    #[error("Invalid level {0} (must be 0-30)")]
    InvalidLevel(u32),
}
