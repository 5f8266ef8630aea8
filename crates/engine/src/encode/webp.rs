//! Lossy WebP encoding through libwebp.

use super::FormatEncoder;
use crate::format::CanonicalFormat;
use crate::pixels::{ChannelLayout, PixelBuffer};
use crate::quality::Quality;
use crate::{CompressionError, Result};

/// WebP encoder using the `webp` crate. Alpha is kept.
#[derive(Debug, Clone, Default)]
pub struct WebpEncoder;

impl WebpEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl FormatEncoder for WebpEncoder {
    fn format(&self) -> CanonicalFormat {
        CanonicalFormat::Webp
    }

    fn encode(&self, pixels: &PixelBuffer, quality: Quality) -> Result<Vec<u8>> {
        let (width, height) = (pixels.width(), pixels.height());
        let encoder = match pixels.layout() {
            ChannelLayout::Rgb8 => webp::Encoder::from_rgb(pixels.data(), width, height),
            ChannelLayout::Rgba8 => webp::Encoder::from_rgba(pixels.data(), width, height),
        };

        let output = encoder
            .encode_simple(false, quality.as_f32())
            .map_err(|e| CompressionError::backend("webp", format!("{:?}", e)))?;

        Ok(output.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_riff_webp() {
        let pixels = PixelBuffer::new(3, 3, ChannelLayout::Rgb8, vec![90; 27]).unwrap();
        let bytes = WebpEncoder::new()
            .encode(&pixels, Quality::new(60).unwrap())
            .unwrap();
        assert!(bytes.starts_with(b"RIFF"));
        assert_eq!(&bytes[8..12], b"WEBP");
    }
}
