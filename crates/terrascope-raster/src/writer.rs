//! GeoTIFF encoding of a [`Raster`].
//!
//! Writes a north-up raster with ModelTiepoint/ModelPixelScale georeferencing,
//! so anything produced here reads back through [`crate::read_raster`] with the
//! same bounding box.

use crate::raster::{Raster, Samples};
use crate::reader::{geo_tag, TAG_GDAL_NODATA, TAG_MODEL_PIXEL_SCALE, TAG_MODEL_TIEPOINT};
use crate::{RasterError, Result};
use std::io::Cursor;
use tiff::encoder::{colortype, TiffEncoder, TiffValue};

/// Encode a raster as an uncompressed GeoTIFF.
///
/// Supported layouts: one band of u8/u16/u32/f32/f64, or three/four bands of
/// u8/u16 (written as RGB/RGBA).
pub fn write_raster(raster: &Raster) -> Result<Vec<u8>> {
    let bands = raster.bands();
    match (bands.len(), &bands[0]) {
        (1, Samples::U8(v)) => encode_image::<colortype::Gray8>(raster, v),
        (1, Samples::U16(v)) => encode_image::<colortype::Gray16>(raster, v),
        (1, Samples::U32(v)) => encode_image::<colortype::Gray32>(raster, v),
        (1, Samples::F32(v)) => encode_image::<colortype::Gray32Float>(raster, v),
        (1, Samples::F64(v)) => encode_image::<colortype::Gray64Float>(raster, v),
        (3, Samples::U8(_)) => {
            encode_image::<colortype::RGB8>(raster, &interleave(&u8_bands(bands)?))
        }
        (3, Samples::U16(_)) => {
            encode_image::<colortype::RGB16>(raster, &interleave(&u16_bands(bands)?))
        }
        (4, Samples::U8(_)) => {
            encode_image::<colortype::RGBA8>(raster, &interleave(&u8_bands(bands)?))
        }
        (4, Samples::U16(_)) => {
            encode_image::<colortype::RGBA16>(raster, &interleave(&u16_bands(bands)?))
        }
        (count, first) => Err(RasterError::UnsupportedLayout(format!(
            "cannot encode {} band(s) of {}",
            count,
            first.sample_type()
        ))),
    }
}

fn encode_image<C>(raster: &Raster, data: &[C::Inner]) -> Result<Vec<u8>>
where
    C: colortype::ColorType,
    [C::Inner]: TiffValue,
{
    let bbox = raster.bounding_box();
    let (scale_x, scale_y) = raster.resolution();
    let pixel_scale = [scale_x, scale_y, 0.0];
    let tiepoint = [0.0, 0.0, 0.0, bbox.west, bbox.north, 0.0];

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor)?;
        let mut image = encoder.new_image::<C>(raster.width(), raster.height())?;
        image
            .encoder()
            .write_tag(geo_tag(TAG_MODEL_PIXEL_SCALE), &pixel_scale[..])?;
        image
            .encoder()
            .write_tag(geo_tag(TAG_MODEL_TIEPOINT), &tiepoint[..])?;
        if let Some(no_data) = raster.no_data() {
            image
                .encoder()
                .write_tag(geo_tag(TAG_GDAL_NODATA), no_data.to_string().as_str())?;
        }
        image.write_data(data)?;
    }
    Ok(cursor.into_inner())
}

fn u8_bands(bands: &[Samples]) -> Result<Vec<&[u8]>> {
    bands
        .iter()
        .map(|b| match b {
            Samples::U8(v) => Ok(v.as_slice()),
            other => Err(mixed_types(other)),
        })
        .collect()
}

fn u16_bands(bands: &[Samples]) -> Result<Vec<&[u16]>> {
    bands
        .iter()
        .map(|b| match b {
            Samples::U16(v) => Ok(v.as_slice()),
            other => Err(mixed_types(other)),
        })
        .collect()
}

fn mixed_types(band: &Samples) -> RasterError {
    RasterError::UnsupportedLayout(format!(
        "bands mix sample types (found {})",
        band.sample_type()
    ))
}

/// Pixel-interleave equally sized bands.
fn interleave<T: Copy>(bands: &[&[T]]) -> Vec<T> {
    let pixels = bands.first().map_or(0, |b| b.len());
    let mut out = Vec::with_capacity(pixels * bands.len());
    for i in 0..pixels {
        out.extend(bands.iter().map(|b| b[i]));
    }
    out
}
