//! The terrain-provider capability set and a static heightmap implementation.

use crate::event::ErrorEvent;
use crate::heightmap::HeightmapTerrainData;
use crate::tiling::GeographicTilingScheme;
use crate::{ProviderError, Result};
use std::f64::consts::PI;
use terrascope_raster::{ElevationGrid, Samples};
use tracing::debug;

/// WGS84 semi-major axis in meters.
pub const WGS84_MAXIMUM_RADIUS: f64 = 6_378_137.0;

/// Attribution shown by the host viewer.
pub const DEFAULT_CREDIT: &str = "Custom Terrain Provider";

/// Attribution for a terrain source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credit {
    /// Text to display.
    pub text: String,
}

impl Credit {
    /// Create a credit.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// What a tile-streaming terrain source has to offer a globe viewer.
pub trait TerrainProvider {
    /// How the globe is split into tiles.
    fn tiling_scheme(&self) -> &GeographicTilingScheme;

    /// Where the provider reports asynchronous failures.
    fn error_event(&self) -> &ErrorEvent;

    /// Attribution for the data.
    fn credit(&self) -> &Credit;

    /// Whether the provider can serve requests.
    fn ready(&self) -> bool;

    /// Whether tiles carry a water mask.
    fn has_water_mask(&self) -> bool;

    /// Whether tiles carry per-vertex normals.
    fn has_vertex_normals(&self) -> bool;

    /// Maximum geometric error, in meters, of tiles at `level`.
    fn level_maximum_geometric_error(&self, level: u32) -> f64;

    /// Whether tile (x, y) at `level` has data. `None` means unknown.
    fn tile_data_available(&self, x: u32, y: u32, level: u32) -> Option<bool>;

    /// Produce the terrain data for one tile.
    fn request_tile_geometry(&self, x: u32, y: u32, level: u32) -> Result<HeightmapTerrainData>;

    /// Make availability information for tile (x, y) at `level` known.
    fn load_tile_data_availability(&self, x: u32, y: u32, level: u32) -> Result<()>;
}

/// A provider around a single precomputed heightmap.
///
/// Constructed once, never changes, always ready. It claims every tile is
/// available but cannot serve any: tile requests fail with
/// [`ProviderError::NotImplemented`].
#[derive(Debug)]
pub struct HeightmapTerrainProvider {
    tiling_scheme: GeographicTilingScheme,
    error_event: ErrorEvent,
    credit: Credit,
    heightmap: HeightmapTerrainData,
}

impl HeightmapTerrainProvider {
    /// Wrap `width * height` elevation samples.
    pub fn new(elevation: Samples, width: u32, height: u32) -> Result<Self> {
        let heightmap = HeightmapTerrainData::new(elevation, width, height)?;
        debug!(width, height, "created heightmap terrain provider");
        Ok(Self {
            tiling_scheme: GeographicTilingScheme::new(),
            error_event: ErrorEvent::new(),
            credit: Credit::new(DEFAULT_CREDIT),
            heightmap,
        })
    }

    /// Wrap an extracted elevation grid.
    pub fn from_grid(grid: &ElevationGrid) -> Result<Self> {
        Self::new(grid.samples().clone(), grid.width(), grid.height())
    }

    /// The wrapped heightmap.
    pub fn heightmap(&self) -> &HeightmapTerrainData {
        &self.heightmap
    }

    /// Geometric error at level 0: the ground distance spanned by one
    /// heightmap sample on a level-0 tile at the equator.
    fn level_zero_geometric_error(&self) -> f64 {
        let samples_across = self.heightmap.width().max(1) as f64;
        let tiles_across = self.tiling_scheme.tiles_x_at_level(0).unwrap_or(1) as f64;
        WGS84_MAXIMUM_RADIUS * 2.0 * PI * 0.25 / (samples_across * tiles_across)
    }
}

impl TerrainProvider for HeightmapTerrainProvider {
    fn tiling_scheme(&self) -> &GeographicTilingScheme {
        &self.tiling_scheme
    }

    fn error_event(&self) -> &ErrorEvent {
        &self.error_event
    }

    fn credit(&self) -> &Credit {
        &self.credit
    }

    fn ready(&self) -> bool {
        true
    }

    fn has_water_mask(&self) -> bool {
        false
    }

    fn has_vertex_normals(&self) -> bool {
        false
    }

    fn level_maximum_geometric_error(&self, level: u32) -> f64 {
        self.level_zero_geometric_error() / 2f64.powi(level.min(i32::MAX as u32) as i32)
    }

    fn tile_data_available(&self, _x: u32, _y: u32, _level: u32) -> Option<bool> {
        Some(true)
    }

    fn request_tile_geometry(&self, _x: u32, _y: u32, _level: u32) -> Result<HeightmapTerrainData> {
        Err(ProviderError::NotImplemented("request_tile_geometry"))
    }

    fn load_tile_data_availability(&self, _x: u32, _y: u32, _level: u32) -> Result<()> {
        Err(ProviderError::NotImplemented("load_tile_data_availability"))
    }
}
