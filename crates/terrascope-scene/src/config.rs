//! Viewer configuration.
//!
//! Everything a load needs is carried in one [`ViewerConfig`] handed to the
//! loader at construction. A minimal YAML file:
//!
//! ```yaml
//! dem:
//!   url: assets/dem.tif
//! satellite:
//!   path: /data/sentinel2_stack.tif
//! asset_base_url: https://example.com/static
//! bands: { red: 3, green: 2, blue: 1 }
//! index_width: u32
//! ```

use crate::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use terrascope_mesh::{IndexWidth, DEFAULT_HEIGHT_SCALE};
use terrascope_raster::{RasterSource, DEFAULT_ELEVATION_BAND};

/// Default tolerance, in degrees, when comparing DEM and satellite extents.
pub const DEFAULT_EXTENT_TOLERANCE_DEG: f64 = 1e-6;

/// Zero-based satellite bands mapped to the red, green, and blue channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BandMapping {
    pub red: usize,
    pub green: usize,
    pub blue: usize,
}

impl Default for BandMapping {
    /// Sentinel-2 true color (B4, B3, B2) in a stack that starts at B1.
    fn default() -> Self {
        Self {
            red: 3,
            green: 2,
            blue: 1,
        }
    }
}

impl BandMapping {
    /// Bands in red, green, blue order.
    pub fn as_array(&self) -> [usize; 3] {
        [self.red, self.green, self.blue]
    }
}

/// Configuration for one terrain viewer.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    /// Digital elevation model.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub dem: RasterSource,
    /// Satellite image providing the texture.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub satellite: RasterSource,
    /// Base URL that relative raster URLs are resolved against.
    #[serde(default)]
    pub asset_base_url: Option<String>,
    /// Access token for the host viewer's imagery services.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub bands: BandMapping,
    /// DEM band holding elevation.
    #[serde(default = "default_elevation_band")]
    pub elevation_band: usize,
    /// Elevation multiplier applied to every vertex.
    #[serde(default = "default_height_scale")]
    pub height_scale: f64,
    #[serde(default)]
    pub index_width: IndexWidth,
    /// Allowed difference, in degrees, between DEM and satellite bounding boxes.
    #[serde(default = "default_extent_tolerance")]
    pub extent_tolerance_deg: f64,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

fn default_elevation_band() -> usize {
    DEFAULT_ELEVATION_BAND
}

fn default_height_scale() -> f64 {
    DEFAULT_HEIGHT_SCALE
}

fn default_extent_tolerance() -> f64 {
    DEFAULT_EXTENT_TOLERANCE_DEG
}

fn default_http_timeout_secs() -> u64 {
    60
}

impl ViewerConfig {
    /// Configuration with default settings for the given rasters.
    pub fn new(dem: RasterSource, satellite: RasterSource) -> Self {
        Self {
            dem,
            satellite,
            asset_base_url: None,
            access_token: None,
            bands: BandMapping::default(),
            elevation_band: default_elevation_band(),
            height_scale: default_height_scale(),
            index_width: IndexWidth::default(),
            extent_tolerance_deg: default_extent_tolerance(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// HTTP request timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.height_scale.is_finite() || self.height_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "height_scale must be positive and finite, got {}",
                self.height_scale
            )));
        }
        if !self.extent_tolerance_deg.is_finite() || self.extent_tolerance_deg < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "extent_tolerance_deg must be non-negative, got {}",
                self.extent_tolerance_deg
            )));
        }
        if self.http_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "http_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let yaml = r#"
dem:
  url: assets/dem.tif
satellite:
  path: /tmp/sat.tif
"#;
        let config = ViewerConfig::from_yaml_str(yaml).unwrap();
        assert!(matches!(config.dem, RasterSource::Url(ref u) if u == "assets/dem.tif"));
        assert!(matches!(config.satellite, RasterSource::Path(_)));
        assert_eq!(config.bands.as_array(), [3, 2, 1]);
        assert_eq!(config.elevation_band, 0);
        assert_eq!(config.height_scale, 1.0);
        assert_eq!(config.index_width, IndexWidth::U32);
        assert_eq!(config.http_timeout(), Duration::from_secs(60));
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_full_yaml() {
        let yaml = r#"
dem:
  url: dem.tif
satellite:
  url: sat.tif
asset_base_url: https://example.com/assets
access_token: abc123
bands: { red: 0, green: 1, blue: 2 }
elevation_band: 1
height_scale: 2.5
index_width: u16
extent_tolerance_deg: 0.001
http_timeout_secs: 5
"#;
        let config = ViewerConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.asset_base_url.as_deref(), Some("https://example.com/assets"));
        assert_eq!(config.access_token.as_deref(), Some("abc123"));
        assert_eq!(config.bands.as_array(), [0, 1, 2]);
        assert_eq!(config.elevation_band, 1);
        assert_eq!(config.height_scale, 2.5);
        assert_eq!(config.index_width, IndexWidth::U16);
        assert_eq!(config.extent_tolerance_deg, 0.001);
        assert_eq!(config.http_timeout_secs, 5);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut config = ViewerConfig::new(
            RasterSource::Url("dem.tif".into()),
            RasterSource::Url("sat.tif".into()),
        );
        assert!(config.validate().is_ok());

        config.height_scale = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.height_scale = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.height_scale = 1.0;

        config.http_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_yaml() {
        assert!(matches!(
            ViewerConfig::from_yaml_str("dem: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            ViewerConfig::from_yaml_str("dem:\n  url: a.tif\nsatellite:\n  url: b.tif\nindex_width: u8\n"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = ViewerConfig::from_file("/nonexistent/terrascope.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
