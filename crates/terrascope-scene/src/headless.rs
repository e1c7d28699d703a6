//! An in-process scene for hosts without a globe viewer.
//!
//! Positions are placed on the WGS84 ellipsoid (Earth-centered, Earth-fixed
//! meters). The committed artifact can be exported as a PNG texture and a
//! Wavefront OBJ mesh.

use crate::scene::{CameraView, SceneArtifact, SceneGraph};
use crate::SceneError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use terrascope_mesh::{Geodetic, TextureError};
use tracing::{debug, info};

/// WGS84 semi-major axis (m).
const WGS84_A: f64 = 6_378_137.0;
/// WGS84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// Geodetic (degrees, meters) to ECEF (meters) on WGS84.
pub fn geodetic_to_ecef(p: &Geodetic) -> [f64; 3] {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let lat = p.latitude.to_radians();
    let lon = p.longitude.to_radians();
    let (sin_lat, cos_lat) = lat.sin_cos();
    let n = WGS84_A / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    [
        (n + p.height) * cos_lat * lon.cos(),
        (n + p.height) * cos_lat * lon.sin(),
        (n * (1.0 - e2) + p.height) * sin_lat,
    ]
}

/// A scene that keeps the committed terrain in memory.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    artifact: Option<SceneArtifact>,
    camera: Option<CameraView>,
    commits: usize,
    access_token: Option<String>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed artifact, if any.
    pub fn artifact(&self) -> Option<&SceneArtifact> {
        self.artifact.as_ref()
    }

    /// Last camera directive.
    pub fn camera(&self) -> Option<&CameraView> {
        self.camera.as_ref()
    }

    /// Token handed over by the last successful load.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Number of successful commits over the scene's lifetime.
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    /// Committed mesh positions as flat ECEF `[x, y, z, ...]`.
    pub fn cartesian_positions(&self) -> Option<Vec<f64>> {
        self.artifact
            .as_ref()
            .map(|a| a.mesh.to_cartesian(geodetic_to_ecef))
    }

    /// Write the committed texture as PNG. Returns false when nothing is committed.
    pub fn write_png(&self, path: &Path) -> Result<bool, TextureError> {
        let Some(artifact) = &self.artifact else {
            return Ok(false);
        };
        artifact.texture.write_png(path)?;
        info!(path = %path.display(), "wrote terrain texture");
        Ok(true)
    }

    /// Write the committed mesh as Wavefront OBJ with ECEF vertices and
    /// per-vertex texture coordinates. Returns false when nothing is committed.
    pub fn write_obj(&self, path: &Path) -> std::io::Result<bool> {
        let Some(artifact) = &self.artifact else {
            return Ok(false);
        };
        let mut out = BufWriter::new(File::create(path)?);
        let mesh = &artifact.mesh;
        let (width, height) = mesh.dimensions();

        writeln!(out, "# terrascope terrain mesh {}x{}", width, height)?;
        for p in mesh.positions() {
            let [x, y, z] = geodetic_to_ecef(p);
            writeln!(out, "v {:.3} {:.3} {:.3}", x, y, z)?;
        }
        // Vertex i samples texture pixel i; OBJ puts v = 0 at the image bottom
        for y in 0..height {
            for x in 0..width {
                let u = x as f64 / (width.max(2) - 1) as f64;
                let v = 1.0 - y as f64 / (height.max(2) - 1) as f64;
                writeln!(out, "vt {:.6} {:.6}", u, v)?;
            }
        }
        for [a, b, c] in mesh.triangles() {
            let (a, b, c) = (a + 1, b + 1, c + 1);
            writeln!(out, "f {a}/{a} {b}/{b} {c}/{c}")?;
        }
        out.flush()?;

        info!(
            path = %path.display(),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "wrote terrain mesh"
        );
        Ok(true)
    }
}

impl SceneGraph for HeadlessScene {
    fn commit(&mut self, artifact: SceneArtifact) -> Result<(), SceneError> {
        if self.artifact.is_some() {
            return Err(SceneError::new(
                "scene already holds a terrain artifact; remove it first",
            ));
        }
        debug!(
            vertices = artifact.mesh.vertex_count(),
            texture = ?(artifact.texture.width(), artifact.texture.height()),
            "committing terrain artifact"
        );
        self.artifact = Some(artifact);
        self.commits += 1;
        Ok(())
    }

    fn remove_artifact(&mut self) -> Option<SceneArtifact> {
        self.artifact.take()
    }

    fn frame_camera(&mut self, view: CameraView) -> Result<(), SceneError> {
        self.camera = Some(view);
        Ok(())
    }

    fn set_access_token(&mut self, token: &str) {
        self.access_token = Some(token.to_string());
    }
}
