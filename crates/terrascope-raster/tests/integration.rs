//! Integration tests for terrascope-raster against in-memory GeoTIFFs.
//!
//! Fixtures are written with the `tiff` encoder directly so the reader is
//! exercised against files it did not produce itself.

use approx::assert_relative_eq;
use std::io::{Cursor, Write};
use terrascope_raster::{
    read_raster, read_raster_file, write_raster, BoundingBox, ElevationGrid, Raster, RasterError,
    RasterFetcher, RasterSource, Samples,
};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const MODEL_TRANSFORMATION: u16 = 34264;
const GDAL_NODATA: u16 = 42113;

/// Write a 16-bit DEM with the given tie point and pixel scale.
fn dem_u16(width: u32, height: u32, tiepoint: &[f64], scale: &[f64]) -> Vec<u8> {
    let data: Vec<u16> = (0..width * height).map(|i| (i * 10) as u16).collect();
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
        let mut image = encoder
            .new_image::<colortype::Gray16>(width, height)
            .unwrap();
        image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE), scale)
            .unwrap();
        image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(MODEL_TIEPOINT), tiepoint)
            .unwrap();
        image.write_data(&data).unwrap();
    }
    cursor.into_inner()
}

#[test]
fn test_read_dem_bounding_box() {
    let bytes = dem_u16(4, 2, &[0.0, 0.0, 0.0, -123.0, 48.0, 0.0], &[0.25, 0.5, 0.0]);
    let raster = read_raster(&bytes).expect("Failed to decode DEM");

    assert_eq!(raster.dimensions(), (4, 2));
    assert_eq!(raster.band_count(), 1);
    let bbox = raster.bounding_box();
    assert_relative_eq!(bbox.west, -123.0);
    assert_relative_eq!(bbox.east, -122.0);
    assert_relative_eq!(bbox.north, 48.0);
    assert_relative_eq!(bbox.south, 47.0);
}

#[test]
fn test_tiepoint_not_at_origin() {
    // Tie pixel (2, 1) to (-122.5, 47.5): the raster origin is one step further out
    let bytes = dem_u16(4, 2, &[2.0, 1.0, 0.0, -122.5, 47.5, 0.0], &[0.25, 0.5, 0.0]);
    let bbox = read_raster(&bytes).unwrap().bounding_box();
    assert_relative_eq!(bbox.west, -123.0);
    assert_relative_eq!(bbox.north, 48.0);
}

#[test]
fn test_gdal_nodata_from_encoder() {
    let data: Vec<u16> = vec![100, 200, 65535, 400];
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
        let mut image = encoder.new_image::<colortype::Gray16>(2, 2).unwrap();
        image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE), &[0.5, 0.5, 0.0][..])
            .unwrap();
        image
            .encoder()
            .write_tag(
                Tag::from_u16_exhaustive(MODEL_TIEPOINT),
                &[0.0, 0.0, 0.0, 8.0, 46.0, 0.0][..],
            )
            .unwrap();
        image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(GDAL_NODATA), "65535")
            .unwrap();
        image.write_data(&data).unwrap();
    }

    let raster = read_raster(cursor.get_ref()).unwrap();
    assert_eq!(raster.no_data(), Some(65535.0));
    assert_eq!(raster.bounding_box(), BoundingBox::new(8.0, 45.0, 9.0, 46.0));
    assert_eq!(raster.band(0).unwrap(), &Samples::U16(data));
}

#[test]
fn test_no_nodata_tag() {
    let bytes = dem_u16(2, 2, &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0.5, 0.5, 0.0]);
    assert_eq!(read_raster(&bytes).unwrap().no_data(), None);
}

/// Assemble an uncompressed little-endian GeoTIFF holding `bands` 16-bit
/// grayscale samples per pixel, pixel-interleaved in a single strip. The
/// encoder has no color type for more than four gray samples, so the
/// directory is laid out by hand.
fn multiband_u16(
    width: u32,
    height: u32,
    bands: usize,
    tiepoint: [f64; 6],
    scale: [f64; 3],
) -> Vec<u8> {
    const SHORT: u16 = 3;
    const LONG: u16 = 4;
    const DOUBLE: u16 = 12;
    const ENTRIES: u32 = 13;

    let pixels = (width * height) as usize;
    let ifd_len = 2 + 12 * ENTRIES + 4;
    let bits_at = 8 + ifd_len;
    let format_at = bits_at + 2 * bands as u32;
    let scale_at = format_at + 2 * bands as u32;
    let tiepoint_at = scale_at + 8 * 3;
    let data_at = tiepoint_at + 8 * 6;
    let data_len = (pixels * bands * 2) as u32;

    let mut out = Vec::new();
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());

    out.extend_from_slice(&(ENTRIES as u16).to_le_bytes());
    let mut entry = |tag: u16, kind: u16, count: u32, value: u32| {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&value.to_le_bytes());
    };
    entry(256, LONG, 1, width);
    entry(257, LONG, 1, height);
    entry(258, SHORT, bands as u32, bits_at);
    entry(259, SHORT, 1, 1); // no compression
    entry(262, SHORT, 1, 1); // BlackIsZero
    entry(273, LONG, 1, data_at);
    entry(277, SHORT, 1, bands as u32);
    entry(278, LONG, 1, height);
    entry(279, LONG, 1, data_len);
    entry(284, SHORT, 1, 1); // chunky
    entry(339, SHORT, bands as u32, format_at);
    entry(MODEL_PIXEL_SCALE, DOUBLE, 3, scale_at);
    entry(MODEL_TIEPOINT, DOUBLE, 6, tiepoint_at);
    out.extend_from_slice(&0u32.to_le_bytes());

    for _ in 0..bands {
        out.extend_from_slice(&16u16.to_le_bytes());
    }
    for _ in 0..bands {
        out.extend_from_slice(&1u16.to_le_bytes()); // unsigned integer
    }
    for v in scale.iter().chain(tiepoint.iter()) {
        out.extend_from_slice(&v.to_le_bytes());
    }
    assert_eq!(out.len() as u32, data_at);

    // Pixel p, band b holds 1000 * b + p
    for p in 0..pixels {
        for b in 0..bands {
            out.extend_from_slice(&((1000 * b + p) as u16).to_le_bytes());
        }
    }
    out
}

#[test]
fn test_five_band_stack_splits() {
    let bytes = multiband_u16(3, 2, 5, [0.0, 0.0, 0.0, 12.0, 42.0, 0.0], [0.5, 0.5, 0.0]);
    let raster = read_raster(&bytes).expect("Failed to decode five-band stack");

    assert_eq!(raster.dimensions(), (3, 2));
    assert_eq!(raster.band_count(), 5);
    assert_eq!(raster.bounding_box(), BoundingBox::new(12.0, 41.0, 13.5, 42.0));
    assert_eq!(raster.band(0).unwrap(), &Samples::U16(vec![0, 1, 2, 3, 4, 5]));
    assert_eq!(
        raster.band(4).unwrap(),
        &Samples::U16(vec![4000, 4001, 4002, 4003, 4004, 4005])
    );

    let grid = ElevationGrid::from_raster(raster, 3).unwrap();
    assert_eq!(grid.height_at(2, 1), Some(3005.0));
}

#[test]
fn test_model_transformation_fallback() {
    let data = vec![1.0f32, 2.0, 3.0, 4.0];
    #[rustfmt::skip]
    let transform = [
        0.5, 0.0, 0.0, 10.0,
        0.0, -0.5, 0.0, 20.0,
        0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ];
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
        let mut image = encoder.new_image::<colortype::Gray32Float>(2, 2).unwrap();
        image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(MODEL_TRANSFORMATION), &transform[..])
            .unwrap();
        image.write_data(&data).unwrap();
    }

    let raster = read_raster(cursor.get_ref()).unwrap();
    assert_eq!(raster.bounding_box(), BoundingBox::new(10.0, 19.0, 11.0, 20.0));
    assert_eq!(raster.band(0).unwrap(), &Samples::F32(data));
}

#[test]
fn test_missing_georeferencing() {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
        encoder
            .write_image::<colortype::Gray8>(2, 2, &[1, 2, 3, 4])
            .unwrap();
    }
    let err = read_raster(cursor.get_ref()).unwrap_err();
    assert!(matches!(err, RasterError::MissingBoundingBox));
    assert!(err.is_decode_error());
}

#[test]
fn test_rgba_bands_split() {
    // Four-band scene; pixel i holds [i, i+10, i+20, i+30]
    let data: Vec<u8> = (0..4u8).flat_map(|i| [i, i + 10, i + 20, i + 30]).collect();
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
        let mut image = encoder.new_image::<colortype::RGBA8>(2, 2).unwrap();
        image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE), &[0.5, 0.5, 0.0][..])
            .unwrap();
        image
            .encoder()
            .write_tag(
                Tag::from_u16_exhaustive(MODEL_TIEPOINT),
                &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0][..],
            )
            .unwrap();
        image.write_data(&data).unwrap();
    }

    let raster = read_raster(cursor.get_ref()).unwrap();
    assert_eq!(raster.band_count(), 4);
    assert_eq!(raster.band(0).unwrap(), &Samples::U8(vec![0, 1, 2, 3]));
    assert_eq!(raster.band(3).unwrap(), &Samples::U8(vec![30, 31, 32, 33]));
}

#[test]
fn test_read_from_file_and_extract_elevation() {
    let bytes = dem_u16(3, 3, &[0.0, 0.0, 0.0, 7.0, 46.0, 0.0], &[0.1, 0.1, 0.0]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();

    let raster = read_raster_file(file.path()).expect("Failed to read DEM file");
    let grid = ElevationGrid::from_raster(raster, 0).unwrap();

    assert!(matches!(grid.samples(), Samples::U16(_)));
    assert_eq!(grid.height_at(0, 0), Some(0.0));
    assert_eq!(grid.height_at(2, 2), Some(80.0));
    assert_eq!(grid.to_rows()[1], vec![30.0, 40.0, 50.0]);
}

#[test]
fn test_writer_output_reads_back() {
    let raster = Raster::new(
        2,
        1,
        BoundingBox::new(-1.0, -1.0, 1.0, 1.0),
        vec![
            Samples::U8(vec![10, 11]),
            Samples::U8(vec![20, 21]),
            Samples::U8(vec![30, 31]),
        ],
    )
    .unwrap();

    let decoded = read_raster(&write_raster(&raster).unwrap()).unwrap();
    assert_eq!(decoded.bands(), raster.bands());
    assert!(decoded
        .bounding_box()
        .approx_eq(&raster.bounding_box(), 1e-12));
}

#[tokio::test]
async fn test_fetcher_loads_path_and_bytes() {
    let bytes = dem_u16(2, 2, &[0.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0.5, 0.5, 0.0]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();

    let fetcher = RasterFetcher::new().unwrap();
    let from_path = fetcher
        .load(&RasterSource::Path(file.path().to_path_buf()))
        .await
        .unwrap();
    let from_bytes = fetcher.load(&RasterSource::from_bytes(bytes)).await.unwrap();

    assert_eq!(from_path.bands(), from_bytes.bands());
    assert_eq!(from_path.bounding_box(), from_bytes.bounding_box());
}
