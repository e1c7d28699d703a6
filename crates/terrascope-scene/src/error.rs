//! Error types for scene orchestration.

use std::path::PathBuf;
use terrascope_mesh::{MeshError, TextureError};
use terrascope_provider::ProviderError;
use terrascope_raster::{BoundingBox, RasterError};
use thiserror::Error;

/// Errors that can occur while loading or validating a [`ViewerConfig`](crate::ViewerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A scene collaborator refused an operation.
#[derive(Debug, Error)]
#[error("Scene error: {0}")]
pub struct SceneError(pub String);

impl SceneError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Which grid property the DEM and satellite rasters disagree on.
#[derive(Debug, Clone, PartialEq)]
pub enum Mismatch {
    Dimensions {
        dem: (u32, u32),
        satellite: (u32, u32),
    },
    Extent {
        dem: BoundingBox,
        satellite: BoundingBox,
    },
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mismatch::Dimensions { dem, satellite } => write!(
                f,
                "DEM is {}x{}, satellite is {}x{}",
                dem.0, dem.1, satellite.0, satellite.1
            ),
            Mismatch::Extent { dem, satellite } => write!(
                f,
                "DEM covers {:?}, satellite covers {:?}",
                dem.to_array(),
                satellite.to_array()
            ),
        }
    }
}

/// Errors that abort a terrain load. A failed load commits nothing.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Terrain provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("DEM and satellite rasters do not line up: {0}")]
    ShapeMismatch(Mismatch),

    #[error("Raster decode task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

impl LoadError {
    /// Whether the load failed because a raster could not be decoded.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, LoadError::Raster(e) if e.is_decode_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_classification() {
        let err = LoadError::from(RasterError::MissingBoundingBox);
        assert!(err.is_decode_error());

        let err = LoadError::from(RasterError::FetchFailed {
            url: "http://example.invalid/dem.tif".into(),
            status: 404,
        });
        assert!(!err.is_decode_error());

        let err = LoadError::ShapeMismatch(Mismatch::Dimensions {
            dem: (4, 4),
            satellite: (4, 5),
        });
        assert!(!err.is_decode_error());
        assert_eq!(
            err.to_string(),
            "DEM and satellite rasters do not line up: DEM is 4x4, satellite is 4x5"
        );
    }
}
