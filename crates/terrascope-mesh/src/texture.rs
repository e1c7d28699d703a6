//! RGBA texture synthesis from three spectral bands.

use crate::TextureError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, ImageEncoder};
use std::path::Path;
use terrascope_raster::Samples;
use tracing::debug;

/// Number of channels in RGBA8 format.
const RGBA8_CHANNELS: usize = 4;

/// Alpha written for every pixel.
const OPAQUE: u8 = 255;

/// Color channel a source band is mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Red => f.write_str("red"),
            Channel::Green => f.write_str("green"),
            Channel::Blue => f.write_str("blue"),
        }
    }
}

/// A tightly packed, fully opaque RGBA8 image.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl TextureImage {
    /// Composite three channel arrays into an RGBA image.
    ///
    /// Pixel `i` becomes `(red[i], green[i], blue[i], 255)`. Samples must
    /// already lie in 0..=255; float samples are rounded half to even.
    pub fn from_channels(
        red: &Samples,
        green: &Samples,
        blue: &Samples,
        width: u32,
        height: u32,
    ) -> Result<Self, TextureError> {
        let expected = red.len();
        for (channel, band) in [(Channel::Green, green), (Channel::Blue, blue)] {
            if band.len() != expected {
                return Err(TextureError::ShapeMismatch {
                    channel,
                    expected,
                    actual: band.len(),
                });
            }
        }
        let pixels = width as usize * height as usize;
        if expected != pixels {
            return Err(TextureError::ShapeMismatch {
                channel: Channel::Red,
                expected: pixels,
                actual: expected,
            });
        }

        let mut rgba = vec![OPAQUE; pixels * RGBA8_CHANNELS];
        for (offset, (channel, band)) in [
            (Channel::Red, red),
            (Channel::Green, green),
            (Channel::Blue, blue),
        ]
        .into_iter()
        .enumerate()
        {
            for (index, value) in band.iter_f64().enumerate() {
                rgba[index * RGBA8_CHANNELS + offset] = to_component(channel, index, value)?;
            }
        }

        debug!(width, height, "synthesized RGBA texture");
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGBA bytes.
    pub fn as_rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Consume the image, returning its RGBA bytes.
    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }

    /// The RGBA components of pixel (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y as usize * self.width as usize + x as usize) * RGBA8_CHANNELS;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.rgba[start..start + RGBA8_CHANNELS]);
        Some(px)
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, TextureError> {
        let mut png = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut png, CompressionType::Default, FilterType::Adaptive);
        encoder.write_image(&self.rgba, self.width, self.height, ColorType::Rgba8.into())?;
        Ok(png)
    }

    /// Encode as a `data:image/png;base64,...` URL for image-backed materials.
    pub fn to_data_url(&self) -> Result<String, TextureError> {
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(self.to_png()?)))
    }

    /// Write the PNG encoding to a file.
    pub fn write_png(&self, path: &Path) -> Result<(), TextureError> {
        std::fs::write(path, self.to_png()?)?;
        Ok(())
    }
}

/// Convert one sample to an 8-bit component without wrapping.
fn to_component(channel: Channel, index: usize, value: f64) -> Result<u8, TextureError> {
    if value.is_nan() || !(0.0..=255.0).contains(&value) {
        return Err(TextureError::ValueRange {
            channel,
            index,
            value,
        });
    }
    Ok(value.round_ties_even() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pixel() {
        let image = TextureImage::from_channels(
            &Samples::U8(vec![10]),
            &Samples::U8(vec![20]),
            &Samples::U8(vec![30]),
            1,
            1,
        )
        .unwrap();
        assert_eq!(image.as_rgba(), &[10, 20, 30, 255]);
    }

    #[test]
    fn test_row_major_order() {
        let image = TextureImage::from_channels(
            &Samples::U8(vec![1, 2, 3, 4]),
            &Samples::U8(vec![5, 6, 7, 8]),
            &Samples::U8(vec![9, 10, 11, 12]),
            2,
            2,
        )
        .unwrap();
        assert_eq!(image.pixel(1, 0), Some([2, 6, 10, 255]));
        assert_eq!(image.pixel(0, 1), Some([3, 7, 11, 255]));
        assert_eq!(image.pixel(2, 0), None);
    }

    #[test]
    fn test_mixed_sample_types() {
        let image = TextureImage::from_channels(
            &Samples::U16(vec![255]),
            &Samples::F32(vec![127.5]),
            &Samples::F64(vec![0.4]),
            1,
            1,
        )
        .unwrap();
        assert_eq!(image.as_rgba(), &[255, 128, 0, 255]);
    }

    #[test]
    fn test_unequal_channels() {
        let err = TextureImage::from_channels(
            &Samples::U8(vec![1, 2]),
            &Samples::U8(vec![1, 2]),
            &Samples::U8(vec![1]),
            2,
            1,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TextureError::ShapeMismatch {
                channel: Channel::Blue,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_channels_shorter_than_image() {
        let err = TextureImage::from_channels(
            &Samples::U8(vec![1]),
            &Samples::U8(vec![1]),
            &Samples::U8(vec![1]),
            2,
            2,
        )
        .unwrap_err();
        assert!(matches!(err, TextureError::ShapeMismatch { expected: 4, actual: 1, .. }));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        // Sentinel-2 reflectance is 12-bit; it has to be scaled before compositing
        let err = TextureImage::from_channels(
            &Samples::U16(vec![12, 4095]),
            &Samples::U16(vec![0, 0]),
            &Samples::U16(vec![0, 0]),
            2,
            1,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TextureError::ValueRange {
                channel: Channel::Red,
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_negative_and_nan_rejected() {
        for bad in [-1.0f32, f32::NAN, 255.6] {
            let result = TextureImage::from_channels(
                &Samples::U8(vec![0]),
                &Samples::F32(vec![bad]),
                &Samples::U8(vec![0]),
                1,
                1,
            );
            assert!(
                matches!(result, Err(TextureError::ValueRange { channel: Channel::Green, .. })),
                "value {} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_png_round_trip_dimensions() {
        let image = TextureImage::from_channels(
            &Samples::U8(vec![0; 6]),
            &Samples::U8(vec![128; 6]),
            &Samples::U8(vec![255; 6]),
            3,
            2,
        )
        .unwrap();
        let png = image.to_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.as_raw(), image.as_rgba());
    }

    #[test]
    fn test_data_url_prefix() {
        let image = TextureImage::from_channels(
            &Samples::U8(vec![10]),
            &Samples::U8(vec![20]),
            &Samples::U8(vec![30]),
            1,
            1,
        )
        .unwrap();
        let url = image.to_data_url().unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
