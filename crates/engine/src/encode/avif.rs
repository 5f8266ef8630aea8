//! Native AVIF encoding with ravif.

use super::FormatEncoder;
use crate::format::CanonicalFormat;
use crate::pixels::PixelBuffer;
use crate::quality::Quality;
use crate::{CompressionError, Result};
use ravif::{Img, RGBA8};

/// AVIF encoder. Slow; speed 1 is best quality, 10 fastest.
#[derive(Debug, Clone)]
pub struct RavifEncoder {
    pub speed: u8,
}

impl Default for RavifEncoder {
    fn default() -> Self {
        Self { speed: 6 }
    }
}

impl RavifEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the encoding speed (1-10)
    pub fn speed(mut self, speed: u8) -> Self {
        self.speed = speed.clamp(1, 10);
        self
    }
}

impl FormatEncoder for RavifEncoder {
    fn format(&self) -> CanonicalFormat {
        CanonicalFormat::Avif
    }

    fn encode(&self, pixels: &PixelBuffer, quality: Quality) -> Result<Vec<u8>> {
        let rgba: Vec<RGBA8> = pixels
            .to_rgba()
            .chunks_exact(4)
            .map(|c| RGBA8::new(c[0], c[1], c[2], c[3]))
            .collect();
        let img = Img::new(rgba.as_slice(), pixels.width() as usize, pixels.height() as usize);

        let encoded = ravif::Encoder::new()
            .with_quality(quality.as_f32())
            .with_speed(self.speed)
            .encode_rgba(img)
            .map_err(|e| CompressionError::backend("avif", e.to_string()))?;

        Ok(encoded.avif_file)
    }
}
