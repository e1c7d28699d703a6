//! Georeferenced raster representation.

use crate::{RasterError, Result};

/// Geographic bounding box in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum longitude (west edge).
    pub west: f64,
    /// Minimum latitude (south edge).
    pub south: f64,
    /// Maximum longitude (east edge).
    pub east: f64,
    /// Maximum latitude (north edge).
    pub north: f64,
}

impl BoundingBox {
    /// Create a bounding box from (west, south, east, north).
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Extent in degrees of longitude.
    pub fn width_deg(&self) -> f64 {
        self.east - self.west
    }

    /// Extent in degrees of latitude.
    pub fn height_deg(&self) -> f64 {
        self.north - self.south
    }

    /// Check if a coordinate is within the bounds.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lat >= self.south && lat <= self.north && lon >= self.west && lon <= self.east
    }

    /// Compare two boxes edge by edge with an absolute tolerance in degrees.
    pub fn approx_eq(&self, other: &BoundingBox, tolerance: f64) -> bool {
        (self.west - other.west).abs() <= tolerance
            && (self.south - other.south).abs() <= tolerance
            && (self.east - other.east).abs() <= tolerance
            && (self.north - other.north).abs() <= tolerance
    }

    /// The box as `[west, south, east, north]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }
}

/// Native numeric type of a band's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl std::fmt::Display for SampleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SampleType::U8 => "u8",
            SampleType::U16 => "u16",
            SampleType::U32 => "u32",
            SampleType::U64 => "u64",
            SampleType::I8 => "i8",
            SampleType::I16 => "i16",
            SampleType::I32 => "i32",
            SampleType::I64 => "i64",
            SampleType::F32 => "f32",
            SampleType::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// One band of samples in row-major order, kept in the file's native precision.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Apply an expression to the vector inside any `Samples` variant.
macro_rules! with_samples {
    ($samples:expr, $v:ident => $body:expr) => {
        match $samples {
            Samples::U8($v) => $body,
            Samples::U16($v) => $body,
            Samples::U32($v) => $body,
            Samples::U64($v) => $body,
            Samples::I8($v) => $body,
            Samples::I16($v) => $body,
            Samples::I32($v) => $body,
            Samples::I64($v) => $body,
            Samples::F32($v) => $body,
            Samples::F64($v) => $body,
        }
    };
}

/// Rebuild a `Samples` of the same variant from a vector-producing expression.
macro_rules! map_samples {
    ($samples:expr, $v:ident => $body:expr) => {
        match $samples {
            Samples::U8($v) => Samples::U8($body),
            Samples::U16($v) => Samples::U16($body),
            Samples::U32($v) => Samples::U32($body),
            Samples::U64($v) => Samples::U64($body),
            Samples::I8($v) => Samples::I8($body),
            Samples::I16($v) => Samples::I16($body),
            Samples::I32($v) => Samples::I32($body),
            Samples::I64($v) => Samples::I64($body),
            Samples::F32($v) => Samples::F32($body),
            Samples::F64($v) => Samples::F64($body),
        }
    };
}

impl Samples {
    /// Number of samples.
    pub fn len(&self) -> usize {
        with_samples!(self, v => v.len())
    }

    /// Whether the band holds no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Native sample type.
    pub fn sample_type(&self) -> SampleType {
        match self {
            Samples::U8(_) => SampleType::U8,
            Samples::U16(_) => SampleType::U16,
            Samples::U32(_) => SampleType::U32,
            Samples::U64(_) => SampleType::U64,
            Samples::I8(_) => SampleType::I8,
            Samples::I16(_) => SampleType::I16,
            Samples::I32(_) => SampleType::I32,
            Samples::I64(_) => SampleType::I64,
            Samples::F32(_) => SampleType::F32,
            Samples::F64(_) => SampleType::F64,
        }
    }

    /// Sample at `index` widened to `f64`.
    ///
    /// Every native type except 64-bit integers beyond 2^53 converts exactly.
    pub fn get(&self, index: usize) -> Option<f64> {
        with_samples!(self, v => v.get(index).map(|&s| s as f64))
    }

    /// Iterate over all samples widened to `f64`.
    pub fn iter_f64(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        with_samples!(self, v => Box::new(v.iter().map(|&s| s as f64)))
    }

    /// Copy all samples into a `Vec<f64>`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.iter_f64().collect()
    }

    /// Copy the samples in `start..end`, keeping the native type.
    pub fn slice(&self, start: usize, end: usize) -> Samples {
        map_samples!(self, v => v[start..end].to_vec())
    }

    /// Minimum and maximum sample value, ignoring NaN. `None` if empty.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.iter_f64()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Split pixel-interleaved samples (`RGBRGB...`) into one band per channel.
    pub fn deinterleave(self, channels: usize) -> Result<Vec<Samples>> {
        if channels == 0 || self.len() % channels != 0 {
            return Err(RasterError::UnsupportedLayout(format!(
                "{} samples cannot be split into {} interleaved channels",
                self.len(),
                channels
            )));
        }
        if channels == 1 {
            return Ok(vec![self]);
        }
        let bands = (0..channels)
            .map(|c| map_samples!(&self, v => v.iter().skip(c).step_by(channels).copied().collect()))
            .collect();
        Ok(bands)
    }

    /// Split band-sequential samples (`RRR...GGG...BBB...`) into one band per plane.
    pub fn split_planes(self, planes: usize) -> Result<Vec<Samples>> {
        if planes == 0 || self.len() % planes != 0 {
            return Err(RasterError::UnsupportedLayout(format!(
                "{} samples cannot be split into {} planes",
                self.len(),
                planes
            )));
        }
        if planes == 1 {
            return Ok(vec![self]);
        }
        let plane_len = self.len() / planes;
        let bands = (0..planes)
            .map(|p| self.slice(p * plane_len, (p + 1) * plane_len))
            .collect();
        Ok(bands)
    }
}

impl TryFrom<tiff::decoder::DecodingResult> for Samples {
    type Error = RasterError;

    fn try_from(result: tiff::decoder::DecodingResult) -> Result<Self> {
        use tiff::decoder::DecodingResult;
        Ok(match result {
            DecodingResult::U8(data) => Samples::U8(data),
            DecodingResult::U16(data) => Samples::U16(data),
            DecodingResult::U32(data) => Samples::U32(data),
            DecodingResult::U64(data) => Samples::U64(data),
            DecodingResult::I8(data) => Samples::I8(data),
            DecodingResult::I16(data) => Samples::I16(data),
            DecodingResult::I32(data) => Samples::I32(data),
            DecodingResult::I64(data) => Samples::I64(data),
            DecodingResult::F32(data) => Samples::F32(data),
            DecodingResult::F64(data) => Samples::F64(data),
            // Half floats have no native Samples variant
            _ => {
                return Err(RasterError::UnsupportedLayout(
                    "sample format has no native representation".into(),
                ))
            }
        })
    }
}

/// A decoded, georeferenced raster with one or more bands of equal size.
#[derive(Debug, Clone)]
pub struct Raster {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// Geographic extent.
    bbox: BoundingBox,
    /// Bands in file order. Each holds exactly width x height samples.
    bands: Vec<Samples>,
    /// GDAL no-data value, if the file declares one.
    no_data: Option<f64>,
}

impl Raster {
    /// Assemble a raster, checking that every band holds width x height samples.
    pub fn new(width: u32, height: u32, bbox: BoundingBox, bands: Vec<Samples>) -> Result<Self> {
        if bands.is_empty() {
            return Err(RasterError::InvalidGeoTiff("raster has no bands".into()));
        }
        let expected = width as usize * height as usize;
        for (band, samples) in bands.iter().enumerate() {
            if samples.len() != expected {
                return Err(RasterError::BandLength {
                    band,
                    expected,
                    actual: samples.len(),
                });
            }
        }
        Ok(Self {
            width,
            height,
            bbox,
            bands,
            no_data: None,
        })
    }

    /// Attach a no-data value.
    pub fn with_no_data(mut self, no_data: Option<f64>) -> Self {
        self.no_data = no_data;
        self
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// (width, height) in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels (width x height).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Geographic extent.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bbox
    }

    /// GDAL no-data value, if any.
    pub fn no_data(&self) -> Option<f64> {
        self.no_data
    }

    /// Number of bands.
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// All bands in file order.
    pub fn bands(&self) -> &[Samples] {
        &self.bands
    }

    /// Borrow one band.
    pub fn band(&self, index: usize) -> Result<&Samples> {
        self.bands.get(index).ok_or(RasterError::BandOutOfRange {
            index,
            count: self.bands.len(),
        })
    }

    /// Take one band out of the raster, dropping the others.
    pub fn into_band(mut self, index: usize) -> Result<Samples> {
        if index >= self.bands.len() {
            return Err(RasterError::BandOutOfRange {
                index,
                count: self.bands.len(),
            });
        }
        Ok(self.bands.swap_remove(index))
    }

    /// Resolution in degrees per pixel (lon, lat).
    pub fn resolution(&self) -> (f64, f64) {
        (
            self.bbox.width_deg() / self.width as f64,
            self.bbox.height_deg() / self.height as f64,
        )
    }
}
