//! What the loader hands to the rendering collaborator.

use crate::SceneError;
use terrascope_mesh::{Mesh, TextureError, TextureImage};
use terrascope_raster::BoundingBox;

/// An image-backed material for the terrain surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// PNG data URL of the texture.
    pub image_url: String,
    /// Always false: the terrain surface is opaque.
    pub translucent: bool,
}

impl Material {
    /// Opaque material showing `texture`.
    pub fn from_texture(texture: &TextureImage) -> Result<Self, TextureError> {
        Ok(Self {
            image_url: texture.to_data_url()?,
            translucent: false,
        })
    }
}

/// One textured terrain mesh: the unit committed to, and removed from, a scene.
///
/// Mesh and texture always travel together so a scene never holds one without
/// the other.
#[derive(Debug, Clone)]
pub struct SceneArtifact {
    pub mesh: Mesh,
    pub texture: TextureImage,
    pub material: Material,
    /// Extent the mesh covers.
    pub bounding_box: BoundingBox,
}

/// A camera directive: show the whole of `destination`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub destination: BoundingBox,
}

impl CameraView {
    pub fn new(destination: BoundingBox) -> Self {
        Self { destination }
    }

    /// Center of the destination as (longitude, latitude).
    pub fn center(&self) -> (f64, f64) {
        let d = &self.destination;
        ((d.west + d.east) / 2.0, (d.south + d.north) / 2.0)
    }
}

/// The rendering collaborator's scene graph.
///
/// `commit` must be all-or-nothing: on error the scene holds no part of the
/// artifact.
pub trait SceneGraph {
    /// Add a textured mesh to the scene.
    fn commit(&mut self, artifact: SceneArtifact) -> Result<(), SceneError>;

    /// Remove the current artifact, returning it if there was one.
    fn remove_artifact(&mut self) -> Option<SceneArtifact>;

    /// Point the camera at a region.
    fn frame_camera(&mut self, view: CameraView) -> Result<(), SceneError>;

    /// Hand over the token for the viewer's own imagery services. Scenes
    /// without token-gated services ignore it.
    fn set_access_token(&mut self, _token: &str) {}
}
