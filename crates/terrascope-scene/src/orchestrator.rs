//! Terrain load orchestration.
//!
//! ```text
//! DEM bytes ──► decode ──► elevation band ─┐
//!                                          ├─► align ─► mesh + texture ─► commit ─► frame camera
//! satellite bytes ──► decode ──────────────┘
//! ```
//!
//! The two raster branches run concurrently and meet at a single join point.
//! Nothing reaches the scene until both the mesh and the texture exist, and
//! any failure before that leaves the scene untouched.

use crate::error::Mismatch;
use crate::scene::{CameraView, Material, SceneArtifact, SceneGraph};
use crate::{LoadError, ViewerConfig};
use terrascope_mesh::{MeshBuilder, TextureImage};
use terrascope_provider::HeightmapTerrainProvider;
use terrascope_raster::{read_raster, ElevationGrid, Raster, RasterFetcher, RasterSource};
use tracing::{debug, info, warn};

/// Everything a load produces, before anything is committed.
#[derive(Debug)]
pub struct PreparedTerrain {
    pub artifact: SceneArtifact,
    pub camera: CameraView,
    /// Terrain provider wrapping the DEM's elevation band.
    pub provider: HeightmapTerrainProvider,
}

/// Outcome of a committed load.
#[derive(Debug)]
pub struct LoadedTerrain {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub camera: CameraView,
    pub provider: HeightmapTerrainProvider,
}

/// Loads a DEM and a satellite image and turns them into one textured mesh.
#[derive(Debug)]
pub struct TerrainLoader {
    config: ViewerConfig,
    fetcher: RasterFetcher,
    mesh_builder: MeshBuilder,
}

impl TerrainLoader {
    /// Create a loader. The configuration is validated here, not at load time.
    pub fn new(config: ViewerConfig) -> Result<Self, LoadError> {
        config.validate()?;

        let mut fetcher = RasterFetcher::with_timeout(config.http_timeout())?;
        if let Some(base_url) = &config.asset_base_url {
            fetcher = fetcher.with_base_url(base_url.clone());
        }
        let mesh_builder = MeshBuilder::new()
            .with_scale(config.height_scale)
            .with_index_width(config.index_width);

        Ok(Self {
            config,
            fetcher,
            mesh_builder,
        })
    }

    /// The loader's configuration.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Fetch, decode and synthesize without touching any scene.
    pub async fn prepare(&self) -> Result<PreparedTerrain, LoadError> {
        info!(
            dem = %self.config.dem.describe(),
            satellite = %self.config.satellite.describe(),
            "loading terrain"
        );

        let (elevation, satellite) =
            tokio::try_join!(self.load_elevation(), self.load_satellite())?;
        check_alignment(&elevation, &satellite, self.config.extent_tolerance_deg)?;

        let mesh = self.mesh_builder.build_from_grid(&elevation)?;
        let texture = self.synthesize_texture(&satellite)?;
        let material = Material::from_texture(&texture)?;
        let provider = HeightmapTerrainProvider::from_grid(&elevation)?;

        let bounding_box = elevation.bounding_box();
        Ok(PreparedTerrain {
            artifact: SceneArtifact {
                mesh,
                texture,
                material,
                bounding_box,
            },
            camera: CameraView::new(bounding_box),
            provider,
        })
    }

    /// Run a full load and commit the result to `scene`.
    ///
    /// Any previously committed artifact is swapped out only once the new one
    /// is ready. If the scene then rejects the commit or the camera directive,
    /// the new artifact is withdrawn and the previous one is put back, so a
    /// failed load leaves the scene as it was.
    pub async fn load_into<S: SceneGraph>(&self, scene: &mut S) -> Result<LoadedTerrain, LoadError> {
        let prepared = self.prepare().await?;
        let vertex_count = prepared.artifact.mesh.vertex_count();
        let triangle_count = prepared.artifact.mesh.triangle_count();

        let previous = scene.remove_artifact();
        if previous.is_some() {
            debug!("removed previous terrain artifact");
        }
        if let Err(e) = scene.commit(prepared.artifact) {
            restore(scene, previous);
            return Err(e.into());
        }
        info!(vertex_count, triangle_count, "terrain committed to scene");

        if let Err(e) = scene.frame_camera(prepared.camera) {
            scene.remove_artifact();
            restore(scene, previous);
            return Err(e.into());
        }
        debug!(destination = ?prepared.camera.destination.to_array(), "camera framed");

        if let Some(token) = &self.config.access_token {
            scene.set_access_token(token);
        }

        Ok(LoadedTerrain {
            vertex_count,
            triangle_count,
            camera: prepared.camera,
            provider: prepared.provider,
        })
    }

    async fn load_elevation(&self) -> Result<ElevationGrid, LoadError> {
        let raster = self.decode(&self.config.dem).await?;
        Ok(ElevationGrid::from_raster(raster, self.config.elevation_band)?)
    }

    async fn load_satellite(&self) -> Result<Raster, LoadError> {
        self.decode(&self.config.satellite).await
    }

    /// Fetch on the async runtime, decode on the blocking pool.
    async fn decode(&self, source: &RasterSource) -> Result<Raster, LoadError> {
        let bytes = self.fetcher.fetch(source).await?;
        let raster = tokio::task::spawn_blocking(move || read_raster(&bytes)).await??;
        debug!(
            source = %source.describe(),
            width = raster.width(),
            height = raster.height(),
            bands = raster.band_count(),
            "decoded raster"
        );
        Ok(raster)
    }

    fn synthesize_texture(&self, satellite: &Raster) -> Result<TextureImage, LoadError> {
        let bands = &self.config.bands;
        let texture = TextureImage::from_channels(
            satellite.band(bands.red)?,
            satellite.band(bands.green)?,
            satellite.band(bands.blue)?,
            satellite.width(),
            satellite.height(),
        )?;
        Ok(texture)
    }
}

/// Put back the artifact a failed load swapped out.
fn restore<S: SceneGraph>(scene: &mut S, previous: Option<SceneArtifact>) {
    let Some(previous) = previous else {
        return;
    };
    match scene.commit(previous) {
        Ok(()) => debug!("restored previous terrain artifact"),
        Err(e) => warn!(error = %e, "failed to restore previous terrain artifact"),
    }
}

/// DEM and satellite must share dimensions and, within `tolerance` degrees, extent.
fn check_alignment(dem: &ElevationGrid, satellite: &Raster, tolerance: f64) -> Result<(), LoadError> {
    let dem_dims = (dem.width(), dem.height());
    if dem_dims != satellite.dimensions() {
        return Err(LoadError::ShapeMismatch(Mismatch::Dimensions {
            dem: dem_dims,
            satellite: satellite.dimensions(),
        }));
    }
    if !dem.bounding_box().approx_eq(&satellite.bounding_box(), tolerance) {
        return Err(LoadError::ShapeMismatch(Mismatch::Extent {
            dem: dem.bounding_box(),
            satellite: satellite.bounding_box(),
        }));
    }
    Ok(())
}
