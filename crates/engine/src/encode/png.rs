//! Lossless PNG encoding with oxipng.

use super::FormatEncoder;
use crate::format::CanonicalFormat;
use crate::pixels::{ChannelLayout, PixelBuffer};
use crate::quality::Quality;
use crate::{CompressionError, Result};
use oxipng::{BitDepth, ColorType, Options, RawImage, StripChunks};

/// PNG encoder. Quality selects the oxipng preset (see [`Quality::png_preset`]).
#[derive(Debug, Clone)]
pub struct OxipngEncoder {
    /// Strip non-critical metadata chunks
    pub strip_metadata: bool,
    /// Allow rewriting colour values of fully transparent pixels
    pub optimize_alpha: bool,
}

impl Default for OxipngEncoder {
    fn default() -> Self {
        Self {
            strip_metadata: true,
            optimize_alpha: false,
        }
    }
}

impl OxipngEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable metadata stripping
    pub fn strip_metadata(mut self, strip: bool) -> Self {
        self.strip_metadata = strip;
        self
    }

    /// Enable or disable alpha optimization
    pub fn optimize_alpha(mut self, optimize: bool) -> Self {
        self.optimize_alpha = optimize;
        self
    }

    fn options(&self, quality: Quality) -> Options {
        let mut opts = Options::from_preset(quality.png_preset());
        opts.optimize_alpha = self.optimize_alpha;
        opts.strip = if self.strip_metadata {
            StripChunks::Safe
        } else {
            StripChunks::None
        };
        opts
    }
}

impl FormatEncoder for OxipngEncoder {
    fn format(&self) -> CanonicalFormat {
        CanonicalFormat::Png
    }

    fn encode(&self, pixels: &PixelBuffer, quality: Quality) -> Result<Vec<u8>> {
        let color_type = match pixels.layout() {
            ChannelLayout::Rgb8 => ColorType::RGB {
                transparent_color: None,
            },
            ChannelLayout::Rgba8 => ColorType::RGBA,
        };

        let raw = RawImage::new(
            pixels.width(),
            pixels.height(),
            color_type,
            BitDepth::Eight,
            pixels.data().to_vec(),
        )
        .map_err(|e| CompressionError::backend("oxipng", e.to_string()))?;

        raw.create_optimized_png(&self.options(quality))
            .map_err(|e| CompressionError::backend("oxipng", e.to_string()))
    }
}
