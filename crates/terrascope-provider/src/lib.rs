//! # terrascope-provider
//!
//! A terrain provider that satisfies a globe viewer's tile-streaming contract
//! while holding only one precomputed heightmap.
//!
//! The provider answers every capability query a streaming source must expose
//! (tiling scheme, error events, geometric error per level, tile availability)
//! but does no streaming: tile geometry and availability loading return
//! [`ProviderError::NotImplemented`].
//!
//! ```
//! use terrascope_provider::{HeightmapTerrainProvider, TerrainProvider};
//! use terrascope_raster::Samples;
//!
//! let provider = HeightmapTerrainProvider::new(Samples::U16(vec![0; 4]), 2, 2)?;
//! assert_eq!(provider.tile_data_available(5, 3, 7), Some(true));
//! assert!(provider.request_tile_geometry(5, 3, 7).is_err());
//! # Ok::<(), terrascope_provider::ProviderError>(())
//! ```

mod error;
mod event;
mod heightmap;
mod provider;
mod tiling;

pub use error::ProviderError;
pub use event::{ErrorEvent, TileProviderError};
pub use heightmap::{HeightmapStructure, HeightmapTerrainData};
pub use provider::{
    Credit, HeightmapTerrainProvider, TerrainProvider, DEFAULT_CREDIT, WGS84_MAXIMUM_RADIUS,
};
pub use tiling::{GeographicTilingScheme, MAX_LEVEL};

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
