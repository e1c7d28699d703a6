//! Raster sources: remote URLs, local files, or bytes already in memory.
//!
//! Remote rasters are fetched with a plain HTTP GET. Relative URLs are resolved
//! against an optional asset base URL, mirroring how a browser resolves asset
//! paths against the page origin.

use crate::{read_raster, Raster, RasterError, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default timeout for raster downloads.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Where a raster's bytes come from.
///
/// In YAML the source is a single-key map (`url: ...` or `path: ...`). Fields
/// of this type need `serde_yaml::with::singleton_map`, since serde_yaml reads
/// plain externally tagged enums only from `!url` style tags.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterSource {
    /// Fetch with HTTP GET. May be relative to the fetcher's base URL.
    Url(String),
    /// Read from the local filesystem.
    Path(PathBuf),
    /// Bytes supplied by the caller (e.g. a user-selected file).
    #[serde(skip)]
    Bytes(Arc<[u8]>),
}

impl RasterSource {
    /// Wrap an in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        RasterSource::Bytes(bytes.into())
    }

    /// Short human-readable description for logs.
    pub fn describe(&self) -> String {
        match self {
            RasterSource::Url(url) => url.clone(),
            RasterSource::Path(path) => path.display().to_string(),
            RasterSource::Bytes(bytes) => format!("<{} bytes in memory>", bytes.len()),
        }
    }
}

/// Fetches raster bytes and decodes them.
#[derive(Debug, Clone)]
pub struct RasterFetcher {
    /// HTTP client for remote sources.
    client: reqwest::Client,
    /// Base URL for relative asset paths.
    base_url: Option<String>,
}

impl RasterFetcher {
    /// Create a fetcher with the default timeout and no base URL.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a fetcher with a request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: None,
        })
    }

    /// Resolve relative URLs against `base_url`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Base URL for relative asset paths, if set.
    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Resolve a possibly relative URL.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.contains("://") {
            return url.to_string();
        }
        match &self.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                url.trim_start_matches("./").trim_start_matches('/')
            ),
            None => url.to_string(),
        }
    }

    /// Read the raw bytes of a source.
    pub async fn fetch(&self, source: &RasterSource) -> Result<Vec<u8>> {
        match source {
            RasterSource::Url(url) => self.fetch_url(url).await,
            RasterSource::Path(path) => {
                let bytes = tokio::fs::read(path).await?;
                debug!(path = %path.display(), bytes = bytes.len(), "read raster file");
                Ok(bytes)
            }
            RasterSource::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }

    /// Fetch and decode a source.
    pub async fn load(&self, source: &RasterSource) -> Result<Raster> {
        let bytes = self.fetch(source).await?;
        read_raster(&bytes)
    }

    async fn fetch_url(&self, url: &str) -> Result<Vec<u8>> {
        let url = self.resolve_url(url);
        info!(%url, "fetching raster");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(RasterError::FetchFailed {
                status: response.status().as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        debug!(%url, bytes = bytes.len(), "raster downloaded");
        Ok(bytes.to_vec())
    }
}
