//! Encoding a [`PixelBuffer`] into a target container.
//!
//! Each canonical format is served by one [`FormatEncoder`]. A [`CodecSet`]
//! bundles the decoder and the encoders so the orchestrator can be driven by
//! real backends or by test doubles.

mod jpeg;
mod png;
mod webp;

#[cfg(feature = "avif")]
mod avif;

pub use jpeg::JpegEncoder;
pub use png::OxipngEncoder;
pub use webp::WebpEncoder;

#[cfg(feature = "avif")]
pub use avif::RavifEncoder;

use crate::config::EngineConfig;
use crate::decode::{ImageDecoder, StandardDecoder};
use crate::format::CanonicalFormat;
use crate::pixels::PixelBuffer;
use crate::quality::Quality;
use crate::{CompressionError, EncodeFailure, Result};

/// Encoder capability for a single output format.
pub trait FormatEncoder: Send + Sync {
    /// The format this encoder produces.
    fn format(&self) -> CanonicalFormat;

    /// Encode the pixels. `pixels` is never zero-area.
    fn encode(&self, pixels: &PixelBuffer, quality: Quality) -> Result<Vec<u8>>;
}

/// The decoder plus one encoder slot per canonical format.
pub struct CodecSet {
    decoder: Box<dyn ImageDecoder>,
    webp: Box<dyn FormatEncoder>,
    jpeg: Box<dyn FormatEncoder>,
    png: Box<dyn FormatEncoder>,
    avif: Option<Box<dyn FormatEncoder>>,
}

impl CodecSet {
    /// Real codec backends configured from `config`.
    ///
    /// The AVIF slot is filled only when the crate is built with the `avif`
    /// feature.
    pub fn standard(config: &EngineConfig) -> Self {
        let set = Self {
            decoder: Box::new(StandardDecoder::new()),
            webp: Box::new(WebpEncoder::new()),
            jpeg: Box::new(JpegEncoder::new(config.flatten_background)),
            png: Box::new(
                OxipngEncoder::new()
                    .strip_metadata(config.png.strip_metadata)
                    .optimize_alpha(config.png.optimize_alpha),
            ),
            avif: None,
        };

        #[cfg(feature = "avif")]
        let set = set.with_encoder(Box::new(RavifEncoder::new().speed(config.avif.speed)));

        set
    }

    /// Replace the decoder.
    pub fn with_decoder(mut self, decoder: Box<dyn ImageDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Install an encoder in the slot for the format it reports.
    pub fn with_encoder(mut self, encoder: Box<dyn FormatEncoder>) -> Self {
        match encoder.format() {
            CanonicalFormat::Webp => self.webp = encoder,
            CanonicalFormat::Jpeg => self.jpeg = encoder,
            CanonicalFormat::Png => self.png = encoder,
            CanonicalFormat::Avif => self.avif = Some(encoder),
        }
        self
    }

    pub fn decoder(&self) -> &dyn ImageDecoder {
        self.decoder.as_ref()
    }

    /// Encoder for `format`, if one is wired in.
    pub fn encoder(&self, format: CanonicalFormat) -> Option<&dyn FormatEncoder> {
        match format {
            CanonicalFormat::Webp => Some(self.webp.as_ref()),
            CanonicalFormat::Jpeg => Some(self.jpeg.as_ref()),
            CanonicalFormat::Png => Some(self.png.as_ref()),
            CanonicalFormat::Avif => self.avif.as_deref(),
        }
    }

    /// Whether a native AVIF encoder is available.
    pub fn has_native_avif(&self) -> bool {
        self.avif.is_some()
    }
}

impl std::fmt::Debug for CodecSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecSet")
            .field("native_avif", &self.has_native_avif())
            .finish_non_exhaustive()
    }
}

/// Encode `pixels` to `format` at `quality` (1-100).
///
/// Out-of-range quality fails with [`EncodeFailure::InvalidParameter`].
/// Zero-area rasters are encoded as a single transparent pixel.
pub fn encode(
    codecs: &CodecSet,
    pixels: &PixelBuffer,
    format: CanonicalFormat,
    quality: u32,
) -> Result<Vec<u8>> {
    let quality = Quality::new(quality)?;
    encode_with_quality(codecs, pixels, format, quality)
}

pub(crate) fn encode_with_quality(
    codecs: &CodecSet,
    pixels: &PixelBuffer,
    format: CanonicalFormat,
    quality: Quality,
) -> Result<Vec<u8>> {
    let encoder = codecs.encoder(format).ok_or_else(|| {
        CompressionError::encode(EncodeFailure::InvalidParameter, "No encoder available for format")
            .with_detail(format.to_string())
    })?;

    let canvas = pixels.encodable();
    let bytes = encoder.encode(&canvas, quality)?;

    tracing::debug!(
        format = %format,
        quality = quality.get(),
        scale = ?format.quality_scale(),
        width = canvas.width(),
        height = canvas.height(),
        bytes = bytes.len(),
        "Encoded image"
    );

    Ok(bytes)
}
