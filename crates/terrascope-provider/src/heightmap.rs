//! Heightmap terrain data: a raw height buffer plus the structure that says
//! how to turn buffer elements into heights.

use crate::{ProviderError, Result};
use terrascope_raster::Samples;

/// Layout of heights inside a heightmap buffer.
///
/// A height is read from `elements_per_height` consecutive elements starting at
/// `index * stride`. Multi-element heights combine as
/// `sum(element[i] * element_multiplier^i)` with element 0 least significant
/// (or most significant when `is_big_endian`). The result is then mapped to
/// `value * height_scale + height_offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightmapStructure {
    /// Multiplier applied to the decoded value.
    pub height_scale: f64,
    /// Offset added after scaling.
    pub height_offset: f64,
    /// Buffer elements that make up one height.
    pub elements_per_height: usize,
    /// Elements between the start of consecutive heights.
    pub stride: usize,
    /// Base of the positional encoding across elements.
    pub element_multiplier: f64,
    /// Whether the first element is the most significant.
    pub is_big_endian: bool,
}

impl Default for HeightmapStructure {
    fn default() -> Self {
        Self {
            height_scale: 1.0,
            height_offset: 0.0,
            elements_per_height: 1,
            stride: 1,
            element_multiplier: 256.0,
            is_big_endian: false,
        }
    }
}

/// A single heightmap covering one tile's worth of terrain.
#[derive(Debug, Clone)]
pub struct HeightmapTerrainData {
    width: u32,
    height: u32,
    buffer: Samples,
    structure: HeightmapStructure,
}

impl HeightmapTerrainData {
    /// Wrap a height buffer with the default structure (one element per height).
    pub fn new(buffer: Samples, width: u32, height: u32) -> Result<Self> {
        Self::with_structure(buffer, width, height, HeightmapStructure::default())
    }

    /// Wrap a height buffer with an explicit structure.
    pub fn with_structure(
        buffer: Samples,
        width: u32,
        height: u32,
        structure: HeightmapStructure,
    ) -> Result<Self> {
        let count = width as usize * height as usize;
        let expected = match count {
            0 => 0,
            n => (n - 1) * structure.stride + structure.elements_per_height,
        };
        if buffer.len() < expected || structure.elements_per_height == 0 {
            return Err(ProviderError::ShapeMismatch {
                expected,
                actual: buffer.len(),
            });
        }
        Ok(Self {
            width,
            height,
            buffer,
            structure,
        })
    }

    /// Width in heights.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in heights.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Layout of the buffer.
    pub fn structure(&self) -> &HeightmapStructure {
        &self.structure
    }

    /// Raw buffer.
    pub fn buffer(&self) -> &Samples {
        &self.buffer
    }

    /// Decoded height at (x, y), or `None` outside the heightmap.
    pub fn height_at(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let s = &self.structure;
        let base = (y as usize * self.width as usize + x as usize) * s.stride;

        let mut value = 0.0;
        for i in 0..s.elements_per_height {
            let element = self.buffer.get(base + i)?;
            let significance = if s.is_big_endian {
                s.elements_per_height - 1 - i
            } else {
                i
            };
            value += element * s.element_multiplier.powi(significance as i32);
        }
        Some(value * s.height_scale + s.height_offset)
    }
}
