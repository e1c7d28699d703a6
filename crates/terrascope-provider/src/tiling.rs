//! Geographic (equirectangular) tiling scheme.
//!
//! ## Tile Coordinate System
//!
//! - Level 0 has two tiles side by side, each 180° x 180°
//! - Every level doubles the tile count along both axes
//! - `x` is the column (0 at the west edge, increases eastward)
//! - `y` is the row (0 at the north edge, increases southward)

use crate::{ProviderError, Result};
use terrascope_raster::BoundingBox;

/// Deepest level whose tile counts fit in a u32.
pub const MAX_LEVEL: u32 = 30;

/// Tiles along X at level 0.
const LEVEL_ZERO_TILES_X: u32 = 2;
/// Tiles along Y at level 0.
const LEVEL_ZERO_TILES_Y: u32 = 1;

/// Partition of longitude/latitude space into a quadtree of tiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicTilingScheme {
    /// Area covered by the scheme.
    rectangle: BoundingBox,
    /// Tiles along X at level 0.
    level_zero_tiles_x: u32,
    /// Tiles along Y at level 0.
    level_zero_tiles_y: u32,
}

impl Default for GeographicTilingScheme {
    fn default() -> Self {
        Self {
            rectangle: BoundingBox::new(-180.0, -90.0, 180.0, 90.0),
            level_zero_tiles_x: LEVEL_ZERO_TILES_X,
            level_zero_tiles_y: LEVEL_ZERO_TILES_Y,
        }
    }
}

impl GeographicTilingScheme {
    /// Whole-globe scheme with 2x1 tiles at level 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Area covered by the scheme.
    pub fn rectangle(&self) -> BoundingBox {
        self.rectangle
    }

    /// Number of tile columns at `level`.
    pub fn tiles_x_at_level(&self, level: u32) -> Result<u32> {
        check_level(level)?;
        Ok(self.level_zero_tiles_x << level)
    }

    /// Number of tile rows at `level`.
    pub fn tiles_y_at_level(&self, level: u32) -> Result<u32> {
        check_level(level)?;
        Ok(self.level_zero_tiles_y << level)
    }

    /// Geographic extent of tile (x, y) at `level`.
    pub fn tile_bounds(&self, x: u32, y: u32, level: u32) -> Result<BoundingBox> {
        let nx = self.tiles_x_at_level(level)?;
        let ny = self.tiles_y_at_level(level)?;
        if x >= nx || y >= ny {
            return Err(ProviderError::InvalidTile { x, y, level });
        }

        let tile_w = self.rectangle.width_deg() / nx as f64;
        let tile_h = self.rectangle.height_deg() / ny as f64;
        let west = self.rectangle.west + x as f64 * tile_w;
        let north = self.rectangle.north - y as f64 * tile_h;
        Ok(BoundingBox::new(west, north - tile_h, west + tile_w, north))
    }

    /// Tile containing (lon, lat) at `level`, or `None` outside the scheme.
    pub fn position_to_tile(&self, lon: f64, lat: f64, level: u32) -> Option<(u32, u32)> {
        if !self.rectangle.contains(lon, lat) {
            return None;
        }
        let nx = self.tiles_x_at_level(level).ok()?;
        let ny = self.tiles_y_at_level(level).ok()?;

        let fx = (lon - self.rectangle.west) / self.rectangle.width_deg();
        let fy = (self.rectangle.north - lat) / self.rectangle.height_deg();

        // Clamp to valid range (handles points exactly on the east/south edge)
        let x = ((fx * nx as f64).floor() as u32).min(nx - 1);
        let y = ((fy * ny as f64).floor() as u32).min(ny - 1);
        Some((x, y))
    }
}

fn check_level(level: u32) -> Result<()> {
    if level > MAX_LEVEL {
        return Err(ProviderError::InvalidLevel(level));
    }
    Ok(())
}
