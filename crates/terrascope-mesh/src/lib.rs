//! # terrascope-mesh
//!
//! Synthesis of the two renderable halves of a terrain scene:
//!
//! - **Mesh**: a regular-grid triangle mesh whose vertices are placed at
//!   (longitude, latitude, elevation) over a raster's bounding box
//!   ([`MeshBuilder`])
//! - **Texture**: an opaque RGBA image composited from three spectral bands,
//!   encodable as PNG or a PNG data URL ([`TextureImage`])
//!
//! ## Example
//!
//! ```
//! use terrascope_mesh::{IndexWidth, MeshBuilder, TextureImage};
//! use terrascope_raster::{BoundingBox, Samples};
//!
//! let bbox = BoundingBox::new(-1.0, -1.0, 1.0, 1.0);
//! let elevation = Samples::U16(vec![0; 16]);
//! let mesh = MeshBuilder::new()
//!     .with_index_width(IndexWidth::U16)
//!     .build(4, 4, bbox, &elevation)?;
//! assert_eq!(mesh.triangle_count(), 18);
//!
//! let band = Samples::U8(vec![128; 16]);
//! let texture = TextureImage::from_channels(&band, &band, &band, 4, 4)?;
//! assert_eq!(texture.pixel(0, 0), Some([128, 128, 128, 255]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod mesh;
mod texture;

pub use error::{MeshError, TextureError};
pub use mesh::{
    Geodetic, IndexWidth, Indices, Mesh, MeshBuilder, PrimitiveType, DEFAULT_HEIGHT_SCALE,
};
pub use texture::{Channel, TextureImage};

/// Result type for mesh and texture operations.
pub type Result<T, E = MeshError> = std::result::Result<T, E>;
