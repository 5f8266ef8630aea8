//! Baseline JPEG encoding with the `image` crate.

use super::FormatEncoder;
use crate::alpha::{flatten_to_rgb, DEFAULT_BACKGROUND};
use crate::format::CanonicalFormat;
use crate::pixels::PixelBuffer;
use crate::quality::Quality;
use crate::{CompressionError, Result};
use image::codecs::jpeg::JpegEncoder as ImageJpegEncoder;
use image::{ColorType, ImageEncoder as _};

/// JPEG encoder. Alpha is composited over `background` first.
#[derive(Debug, Clone)]
pub struct JpegEncoder {
    background: [u8; 3],
}

impl Default for JpegEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_BACKGROUND)
    }
}

impl JpegEncoder {
    /// Create an encoder flattening onto `background` (RGB).
    pub fn new(background: [u8; 3]) -> Self {
        Self { background }
    }
}

impl FormatEncoder for JpegEncoder {
    fn format(&self) -> CanonicalFormat {
        CanonicalFormat::Jpeg
    }

    fn encode(&self, pixels: &PixelBuffer, quality: Quality) -> Result<Vec<u8>> {
        let rgb = flatten_to_rgb(pixels, self.background);
        let mut buffer = Vec::new();

        ImageJpegEncoder::new_with_quality(&mut buffer, quality.get())
            .write_image(&rgb, pixels.width(), pixels.height(), ColorType::Rgb8)
            .map_err(|e| CompressionError::backend("jpeg", e.to_string()).with_source(e))?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::ChannelLayout;

    #[test]
    fn test_output_is_jpeg() {
        let pixels = PixelBuffer::new(2, 2, ChannelLayout::Rgb8, vec![128; 12]).unwrap();
        let bytes = JpegEncoder::default()
            .encode(&pixels, Quality::new(80).unwrap())
            .unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8, 0xFF]));
    }

    #[test]
    fn test_transparent_pixel_takes_background() {
        let pixels = PixelBuffer::new(8, 8, ChannelLayout::Rgba8, vec![0; 256]).unwrap();
        let bytes = JpegEncoder::new([0, 0, 255])
            .encode(&pixels, Quality::new(100).unwrap())
            .unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        let px = decoded.get_pixel(4, 4);
        assert!(px[0] < 16 && px[1] < 16 && px[2] > 239, "got {:?}", px);
    }
}
