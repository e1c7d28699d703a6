//! # terrascope-scene
//!
//! Wires the terrascope pipeline together: fetch and decode a DEM and a
//! satellite image, build a textured terrain mesh, commit it to a scene, and
//! frame the camera on it.
//!
//! The rendering side is a collaborator behind the [`SceneGraph`] trait.
//! [`HeadlessScene`] implements it in memory and can export the result as
//! PNG + OBJ.
//!
//! ## Example
//!
//! ```no_run
//! use terrascope_scene::{HeadlessScene, TerrainLoader, ViewerConfig};
//!
//! # async fn run() -> Result<(), terrascope_scene::LoadError> {
//! let config = ViewerConfig::from_file("terrascope.yaml")?;
//! let loader = TerrainLoader::new(config)?;
//!
//! let mut scene = HeadlessScene::new();
//! let loaded = loader.load_into(&mut scene).await?;
//! println!("{} triangles", loaded.triangle_count);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod headless;
mod orchestrator;
mod scene;

pub use config::{BandMapping, ViewerConfig, DEFAULT_EXTENT_TOLERANCE_DEG};
pub use error::{ConfigError, LoadError, Mismatch, SceneError};
pub use headless::{geodetic_to_ecef, HeadlessScene};
pub use orchestrator::{LoadedTerrain, PreparedTerrain, TerrainLoader};
pub use scene::{CameraView, Material, SceneArtifact, SceneGraph};

/// Result type for terrain loads.
pub type Result<T> = std::result::Result<T, LoadError>;
