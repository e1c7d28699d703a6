//! GeoTIFF decoding into a [`Raster`].

use crate::raster::{BoundingBox, Raster, Samples};
use crate::{RasterError, Result};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, Limits};
use tiff::tags::Tag;
use tracing::debug;

/// GeoTIFF ModelPixelScale tag.
pub(crate) const TAG_MODEL_PIXEL_SCALE: u16 = 33550;
/// GeoTIFF ModelTiepoint tag.
pub(crate) const TAG_MODEL_TIEPOINT: u16 = 33922;
/// GeoTIFF ModelTransformation tag.
pub(crate) const TAG_MODEL_TRANSFORMATION: u16 = 34264;
/// GDAL_NODATA tag, stored as an ASCII string.
pub(crate) const TAG_GDAL_NODATA: u16 = 42113;

/// Tag for a GeoTIFF/GDAL code. The decoder reports registered codes under
/// their named variants, so `Tag::Unknown(code)` would never match them.
pub(crate) fn geo_tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

/// PlanarConfiguration value for band-sequential storage.
const PLANAR_SEPARATE: u16 = 2;

/// Decode a GeoTIFF held in memory.
pub fn read_raster(bytes: &[u8]) -> Result<Raster> {
    decode(Cursor::new(bytes))
}

/// Decode a GeoTIFF from a local file.
pub fn read_raster_file<P: AsRef<Path>>(path: P) -> Result<Raster> {
    let file = std::fs::File::open(path.as_ref())?;
    decode(std::io::BufReader::new(file))
}

fn decode<R: Read + Seek>(reader: R) -> Result<Raster> {
    let mut decoder = Decoder::new(reader)?;

    // Satellite scenes and 1/3 arc-second DEM tiles both exceed the default limits
    let mut limits = Limits::default();
    limits.decoding_buffer_size = 1024 * 1024 * 1024; // 1 GB
    limits.intermediate_buffer_size = 1024 * 1024 * 1024; // 1 GB
    limits.ifd_value_size = 1024 * 1024 * 1024;
    decoder = decoder.with_limits(limits);

    let (width, height) = decoder.dimensions()?;
    if width == 0 || height == 0 {
        return Err(RasterError::InvalidGeoTiff(format!(
            "image has zero extent ({}x{})",
            width, height
        )));
    }

    let bbox = read_bounding_box(&mut decoder, width, height)?;
    let no_data = read_nodata_value(&mut decoder);
    let samples_per_pixel = read_samples_per_pixel(&mut decoder);
    let planar = decoder
        .find_tag(Tag::PlanarConfiguration)?
        .and_then(|v| v.into_u16().ok())
        == Some(PLANAR_SEPARATE);

    let samples = Samples::try_from(decoder.read_image()?)?;
    let bands = split_bands(samples, width, height, samples_per_pixel, planar)?;

    debug!(
        width,
        height,
        bands = bands.len(),
        sample_type = %bands[0].sample_type(),
        west = bbox.west,
        south = bbox.south,
        east = bbox.east,
        north = bbox.north,
        "decoded GeoTIFF"
    );

    Ok(Raster::new(width, height, bbox, bands)?.with_no_data(no_data))
}

/// Split the decoder's flat sample buffer into per-band arrays.
fn split_bands(
    samples: Samples,
    width: u32,
    height: u32,
    samples_per_pixel: usize,
    planar: bool,
) -> Result<Vec<Samples>> {
    let pixels = width as usize * height as usize;
    let total = samples.len();

    if samples_per_pixel <= 1 || total == pixels {
        if total != pixels {
            return Err(RasterError::UnsupportedLayout(format!(
                "expected {} samples, decoder returned {}",
                pixels, total
            )));
        }
        // A planar file where the decoder only handed back the first plane
        // cannot be split; report how many bands were lost.
        if samples_per_pixel > 1 {
            return Err(RasterError::UnsupportedLayout(format!(
                "planar image with {} samples per pixel decoded to a single plane",
                samples_per_pixel
            )));
        }
        return Ok(vec![samples]);
    }

    if total != pixels * samples_per_pixel {
        return Err(RasterError::UnsupportedLayout(format!(
            "expected {} samples ({} per pixel), decoder returned {}",
            pixels * samples_per_pixel,
            samples_per_pixel,
            total
        )));
    }

    if planar {
        samples.split_planes(samples_per_pixel)
    } else {
        samples.deinterleave(samples_per_pixel)
    }
}

fn read_samples_per_pixel<R: Read + Seek>(decoder: &mut Decoder<R>) -> usize {
    decoder
        .get_tag_u32(Tag::SamplesPerPixel)
        .map(|n| n as usize)
        .unwrap_or(1)
}

/// Derive the bounding box from GeoTIFF georeferencing tags.
fn read_bounding_box<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    width: u32,
    height: u32,
) -> Result<BoundingBox> {
    let tiepoint = decoder.get_tag_f64_vec(geo_tag(TAG_MODEL_TIEPOINT));
    let pixel_scale = decoder.get_tag_f64_vec(geo_tag(TAG_MODEL_PIXEL_SCALE));

    if let (Ok(tiepoint), Ok(scale)) = (tiepoint, pixel_scale) {
        if tiepoint.len() >= 6 && scale.len() >= 2 {
            // Tiepoint format: [i, j, k, x, y, z] where (i,j) is pixel coords and (x,y) is geo coords
            let (i, j) = (tiepoint[0], tiepoint[1]);
            let (scale_x, scale_y) = (scale[0], scale[1]);
            let west = tiepoint[3] - i * scale_x;
            let north = tiepoint[4] + j * scale_y;
            return Ok(corners_to_box(
                west,
                north,
                west + width as f64 * scale_x,
                north - height as f64 * scale_y,
            ));
        }
    }

    // 4x4 row-major affine matrix; only the unrotated case is meaningful here
    if let Ok(m) = decoder.get_tag_f64_vec(geo_tag(TAG_MODEL_TRANSFORMATION)) {
        if m.len() >= 16 {
            if m[1] != 0.0 || m[4] != 0.0 {
                return Err(RasterError::InvalidGeoTiff(
                    "rotated ModelTransformation is not supported".into(),
                ));
            }
            let (origin_x, origin_y) = (m[3], m[7]);
            return Ok(corners_to_box(
                origin_x,
                origin_y,
                origin_x + width as f64 * m[0],
                origin_y + height as f64 * m[5],
            ));
        }
    }

    Err(RasterError::MissingBoundingBox)
}

/// Normalize two opposite corners into (west, south, east, north).
fn corners_to_box(x0: f64, y0: f64, x1: f64, y1: f64) -> BoundingBox {
    BoundingBox::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}

/// Try to read the no-data value from GDAL_NODATA tag.
fn read_nodata_value<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f64> {
    decoder
        .get_tag_ascii_string(geo_tag(TAG_GDAL_NODATA))
        .ok()
        .and_then(|s| s.trim_matches(char::from(0)).trim().parse().ok())
}
