//! Elevation band extraction.

use crate::raster::{BoundingBox, Raster, Samples};
use crate::Result;
use tracing::debug;

/// Band holding elevation in single-band DEM files.
pub const DEFAULT_ELEVATION_BAND: usize = 0;

/// A single band of height samples with the raster's geometry.
///
/// Samples keep the file's native type (u16, f32, ...) so nothing is lost
/// before they reach vertex positions.
#[derive(Debug, Clone)]
pub struct ElevationGrid {
    width: u32,
    height: u32,
    bbox: BoundingBox,
    samples: Samples,
    no_data: Option<f64>,
}

impl ElevationGrid {
    /// Pull one band out of a decoded DEM raster.
    pub fn from_raster(raster: Raster, band: usize) -> Result<Self> {
        let (width, height) = raster.dimensions();
        let bbox = raster.bounding_box();
        let no_data = raster.no_data();
        let samples = raster.into_band(band)?;

        debug!(
            band,
            width,
            height,
            sample_type = %samples.sample_type(),
            range = ?samples.min_max(),
            "extracted elevation band"
        );

        Ok(Self {
            width,
            height,
            bbox,
            samples,
            no_data,
        })
    }

    /// Width in samples.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in samples.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Geographic extent.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// Raw samples in row-major order.
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Consume the grid, returning its samples.
    pub fn into_samples(self) -> Samples {
        self.samples
    }

    /// GDAL no-data value, if the source declared one.
    pub fn no_data(&self) -> Option<f64> {
        self.no_data
    }

    /// Height at pixel (x, y), or `None` outside the grid.
    pub fn height_at(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.samples.get(y as usize * self.width as usize + x as usize)
    }

    /// Iterate over rows, north-most first as stored in the file.
    pub fn rows(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        let width = self.width as usize;
        (0..self.height as usize).map(move |y| {
            (0..width)
                .filter_map(|x| self.samples.get(y * width + x))
                .collect()
        })
    }

    /// The grid as a vector of rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RasterError;

    fn dem() -> Raster {
        Raster::new(
            3,
            2,
            BoundingBox::new(0.0, 0.0, 3.0, 2.0),
            vec![Samples::U16(vec![100, 200, 300, 400, 500, 65535])],
        )
        .unwrap()
        .with_no_data(Some(-9999.0))
    }

    #[test]
    fn test_preserves_u16_precision() {
        let grid = ElevationGrid::from_raster(dem(), DEFAULT_ELEVATION_BAND).unwrap();
        assert!(matches!(grid.samples(), Samples::U16(_)));
        assert_eq!(grid.height_at(2, 1), Some(65535.0));
        assert_eq!(grid.no_data(), Some(-9999.0));
    }

    #[test]
    fn test_height_at_out_of_grid() {
        let grid = ElevationGrid::from_raster(dem(), 0).unwrap();
        assert_eq!(grid.height_at(3, 0), None);
        assert_eq!(grid.height_at(0, 2), None);
    }

    #[test]
    fn test_rows() {
        let grid = ElevationGrid::from_raster(dem(), 0).unwrap();
        assert_eq!(
            grid.to_rows(),
            vec![vec![100.0, 200.0, 300.0], vec![400.0, 500.0, 65535.0]]
        );
    }

    #[test]
    fn test_missing_band() {
        let err = ElevationGrid::from_raster(dem(), 1).unwrap_err();
        assert!(matches!(err, RasterError::BandOutOfRange { index: 1, count: 1 }));
        assert!(err.is_decode_error());
    }
}
