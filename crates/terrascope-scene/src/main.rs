//! terrascope: build a textured terrain mesh from a DEM and a satellite image.
//!
//! Usage:
//!   terrascope --config terrascope.yaml --texture-out terrain.png --mesh-out terrain.obj
//!   terrascope --dem dem.tif --satellite sentinel2.tif --mesh-out terrain.obj

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use terrascope_provider::TerrainProvider;
use terrascope_raster::RasterSource;
use terrascope_scene::{HeadlessScene, LoadError, TerrainLoader, ViewerConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "terrascope",
    about = "Build a textured terrain mesh from a DEM and a satellite GeoTIFF",
    version
)]
struct Cli {
    /// YAML viewer configuration.
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// DEM GeoTIFF (URL or path). Overrides the config file.
    #[arg(long)]
    dem: Option<String>,

    /// Satellite GeoTIFF (URL or path). Overrides the config file.
    #[arg(long)]
    satellite: Option<String>,

    /// Write the texture as PNG.
    #[arg(long = "texture-out")]
    texture_out: Option<PathBuf>,

    /// Write the mesh as Wavefront OBJ.
    #[arg(long = "mesh-out")]
    mesh_out: Option<PathBuf>,

    /// Debug logging (RUST_LOG still takes precedence).
    #[arg(long, short)]
    verbose: bool,
}

fn parse_source(arg: &str) -> RasterSource {
    if arg.contains("://") {
        RasterSource::Url(arg.to_string())
    } else {
        RasterSource::Path(PathBuf::from(arg))
    }
}

fn build_config(cli: &Cli) -> Result<ViewerConfig, LoadError> {
    let mut config = match (&cli.config, &cli.dem, &cli.satellite) {
        (Some(path), _, _) => ViewerConfig::from_file(path)?,
        (None, Some(dem), Some(satellite)) => {
            ViewerConfig::new(parse_source(dem), parse_source(satellite))
        }
        _ => {
            return Err(terrascope_scene::ConfigError::Invalid(
                "either --config or both --dem and --satellite are required".to_string(),
            )
            .into())
        }
    };
    if let Some(dem) = &cli.dem {
        config.dem = parse_source(dem);
    }
    if let Some(satellite) = &cli.satellite {
        config.satellite = parse_source(satellite);
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let loader = TerrainLoader::new(build_config(&cli)?)?;
    let mut scene = HeadlessScene::new();
    let loaded = loader.load_into(&mut scene).await?;

    let (lon, lat) = loaded.camera.center();
    info!(
        vertices = loaded.vertex_count,
        triangles = loaded.triangle_count,
        center_lon = lon,
        center_lat = lat,
        ready = loaded.provider.ready(),
        "terrain loaded"
    );

    if let Some(path) = &cli.texture_out {
        scene.write_png(path)?;
    }
    if let Some(path) = &cli.mesh_out {
        scene.write_obj(path)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_argument() {
        assert!(matches!(parse_source("https://a/b.tif"), RasterSource::Url(_)));
        assert!(matches!(parse_source("data/b.tif"), RasterSource::Path(_)));
    }

    #[test]
    fn test_config_requires_rasters() {
        let cli = Cli::parse_from(["terrascope", "--dem", "dem.tif"]);
        assert!(matches!(build_config(&cli), Err(LoadError::Config(_))));

        let cli = Cli::parse_from(["terrascope", "--dem", "dem.tif", "--satellite", "sat.tif"]);
        let config = build_config(&cli).unwrap();
        assert!(matches!(config.satellite, RasterSource::Path(_)));
    }
}
