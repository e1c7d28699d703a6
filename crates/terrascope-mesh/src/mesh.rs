//! Regular-grid terrain mesh built from an elevation array.
//!
//! Vertex (x, y) sits at
//!   lon = west  + (east  - west)  * x / width
//!   lat = south + (north - south) * y / height
//!   h   = elevation[y * width + x] * scale
//!
//! Positions stay geodetic; turning them into renderer coordinates is the
//! caller's business (see [`Mesh::to_cartesian`]).
//!
//! Every cell (x, y) with x < width - 1 and y < height - 1 contributes two
//! triangles, `(i, i+1, i+w)` and `(i+1, i+w+1, i+w)` where `i = y*w + x`.
//! The last row and column contribute none.

use crate::{MeshError, Result};
use serde::Deserialize;
use terrascope_raster::{BoundingBox, ElevationGrid, Samples};
use tracing::debug;

/// Default elevation multiplier.
pub const DEFAULT_HEIGHT_SCALE: f64 = 1.0;

/// A point as (longitude, latitude) in degrees and height in the elevation's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geodetic {
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Height above the reference datum.
    pub height: f64,
}

impl Geodetic {
    /// Create a geodetic position.
    pub fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }
}

/// Integer width of the index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexWidth {
    /// 16-bit indices, at most 65 536 vertices.
    U16,
    /// 32-bit indices.
    #[default]
    U32,
}

impl IndexWidth {
    /// Largest vertex count whose indices all fit.
    pub fn max_vertices(self) -> usize {
        match self {
            IndexWidth::U16 => u16::MAX as usize + 1,
            IndexWidth::U32 => (u32::MAX as usize).saturating_add(1),
        }
    }
}

impl std::fmt::Display for IndexWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexWidth::U16 => f.write_str("u16"),
            IndexWidth::U32 => f.write_str("u32"),
        }
    }
}

/// Triangle index buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Indices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Indices {
    /// Number of indices (three per triangle).
    pub fn len(&self) -> usize {
        match self {
            Indices::U16(v) => v.len(),
            Indices::U32(v) => v.len(),
        }
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index width of this buffer.
    pub fn width(&self) -> IndexWidth {
        match self {
            Indices::U16(_) => IndexWidth::U16,
            Indices::U32(_) => IndexWidth::U32,
        }
    }

    /// Index at position `i`, widened to u32.
    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Indices::U16(v) => v.get(i).map(|&n| n as u32),
            Indices::U32(v) => v.get(i).copied(),
        }
    }

    /// Iterate over all indices widened to u32.
    pub fn iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            Indices::U16(v) => Box::new(v.iter().map(|&n| n as u32)),
            Indices::U32(v) => Box::new(v.iter().copied()),
        }
    }
}

/// How the index buffer is to be assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    /// Every three indices form one triangle.
    Triangles,
}

/// A triangulated terrain surface.
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Grid width in vertices.
    width: u32,
    /// Grid height in vertices.
    height: u32,
    /// One position per grid cell, row-major.
    positions: Vec<Geodetic>,
    /// Triangle corner triples into `positions`.
    indices: Indices,
}

impl Mesh {
    /// Grid dimensions in vertices.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Vertex positions, row-major.
    pub fn positions(&self) -> &[Geodetic] {
        &self.positions
    }

    /// Index buffer.
    pub fn indices(&self) -> &Indices {
        &self.indices
    }

    /// Primitive assembly mode.
    pub fn primitive_type(&self) -> PrimitiveType {
        PrimitiveType::Triangles
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as corner index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        (0..self.triangle_count()).filter_map(move |t| {
            Some([
                self.indices.get(3 * t)?,
                self.indices.get(3 * t + 1)?,
                self.indices.get(3 * t + 2)?,
            ])
        })
    }

    /// Flatten positions into `[x0, y0, z0, x1, ...]` through a
    /// geodetic-to-Cartesian conversion supplied by the renderer.
    pub fn to_cartesian<F>(&self, mut convert: F) -> Vec<f64>
    where
        F: FnMut(&Geodetic) -> [f64; 3],
    {
        let mut out = Vec::with_capacity(self.positions.len() * 3);
        for p in &self.positions {
            out.extend_from_slice(&convert(p));
        }
        out
    }
}

/// Builds [`Mesh`]es from elevation arrays.
#[derive(Debug, Clone, Copy)]
pub struct MeshBuilder {
    /// Elevation multiplier.
    scale: f64,
    /// Index buffer width.
    index_width: IndexWidth,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self {
            scale: DEFAULT_HEIGHT_SCALE,
            index_width: IndexWidth::default(),
        }
    }
}

impl MeshBuilder {
    /// Builder with scale 1.0 and 32-bit indices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the elevation multiplier.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Set the index buffer width.
    pub fn with_index_width(mut self, index_width: IndexWidth) -> Self {
        self.index_width = index_width;
        self
    }

    /// Elevation multiplier.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Index buffer width.
    pub fn index_width(&self) -> IndexWidth {
        self.index_width
    }

    /// Build a mesh from an extracted elevation grid.
    pub fn build_from_grid(&self, grid: &ElevationGrid) -> Result<Mesh> {
        self.build(
            grid.width(),
            grid.height(),
            grid.bounding_box(),
            grid.samples(),
        )
    }

    /// Build a mesh over `bbox` from `width * height` row-major elevation samples.
    ///
    /// Grids narrower or shorter than two vertices yield no triangles.
    pub fn build(
        &self,
        width: u32,
        height: u32,
        bbox: BoundingBox,
        elevation: &Samples,
    ) -> Result<Mesh> {
        let (w, h) = (width as usize, height as usize);
        let vertices = w * h;
        if elevation.len() != vertices {
            return Err(MeshError::ShapeMismatch {
                expected: vertices,
                actual: elevation.len(),
            });
        }
        let max = self.index_width.max_vertices();
        if vertices > max {
            return Err(MeshError::IndexOverflow {
                vertices,
                max,
                width: self.index_width,
            });
        }

        let positions = self.positions(w, h, bbox, elevation);
        let indices = match self.index_width {
            // Both casts are lossless: every index is < vertices <= max_vertices
            IndexWidth::U16 => Indices::U16(grid_indices(w, h, |i| i as u16)),
            IndexWidth::U32 => Indices::U32(grid_indices(w, h, |i| i as u32)),
        };

        debug!(
            width,
            height,
            vertices = positions.len(),
            triangles = indices.len() / 3,
            index_width = %self.index_width,
            "built terrain mesh"
        );

        Ok(Mesh {
            width,
            height,
            positions,
            indices,
        })
    }

    /// One vertex per sample, row-major. `elevation` holds exactly `w * h` samples.
    fn positions(&self, w: usize, h: usize, bbox: BoundingBox, elevation: &Samples) -> Vec<Geodetic> {
        let lon_span = bbox.east - bbox.west;
        let lat_span = bbox.north - bbox.south;
        elevation
            .iter_f64()
            .enumerate()
            .map(|(i, sample)| {
                let (x, y) = (i % w, i / w);
                Geodetic::new(
                    bbox.west + lon_span * x as f64 / w as f64,
                    bbox.south + lat_span * y as f64 / h as f64,
                    sample * self.scale,
                )
            })
            .collect()
    }
}

/// Two triangles per interior cell, no wraparound at the last row or column.
fn grid_indices<T>(w: usize, h: usize, cast: impl Fn(usize) -> T) -> Vec<T> {
    if w < 2 || h < 2 {
        return Vec::new();
    }
    let mut indices = Vec::with_capacity((w - 1) * (h - 1) * 6);
    for y in 0..h - 1 {
        for x in 0..w - 1 {
            let i = y * w + x;
            indices.extend([i, i + 1, i + w].map(&cast));
            indices.extend([i + 1, i + w + 1, i + w].map(&cast));
        }
    }
    indices
}
