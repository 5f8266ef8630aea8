//! Decoding opaque image bytes into a [`PixelBuffer`].

use crate::detect::{detect_source_format, SourceFormat};
use crate::pixels::{ChannelLayout, PixelBuffer};
use crate::{CompressionError, Result};
use image::DynamicImage;

/// Decoder capability. Implementations must not touch shared state.
pub trait ImageDecoder: Send + Sync {
    /// Decode a complete image file held in memory.
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer>;
}

/// Decoder backed by the `image` crate (PNG, JPEG, WebP, GIF).
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDecoder;

impl StandardDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl ImageDecoder for StandardDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<PixelBuffer> {
        if bytes.is_empty() {
            return Err(CompressionError::decode("Image data is empty"));
        }

        let source = detect_source_format(bytes).ok_or_else(|| {
            CompressionError::decode("Bytes do not correspond to a valid image")
                .with_detail("unrecognized file signature")
        })?;

        let img = image::load_from_memory_with_format(bytes, source.to_image_format()).map_err(|e| {
            CompressionError::decode(format!("Failed to decode {} image", source_name(source)))
                .with_detail(e.to_string())
                .with_source(e)
        })?;

        let pixels = into_pixel_buffer(img)?;

        tracing::debug!(
            source = source_name(source),
            width = pixels.width(),
            height = pixels.height(),
            alpha = pixels.layout().has_alpha(),
            "Decoded image"
        );

        Ok(pixels)
    }
}

fn source_name(source: SourceFormat) -> &'static str {
    match source {
        SourceFormat::Jpeg => "JPEG",
        SourceFormat::Png => "PNG",
        SourceFormat::WebP => "WebP",
        SourceFormat::Gif => "GIF",
    }
}

/// Check if an image has an alpha channel
fn has_alpha_channel(img: &DynamicImage) -> bool {
    img.color().has_alpha()
}

/// Normalize to 8-bit RGB or RGBA, keeping alpha when the source has it.
fn into_pixel_buffer(img: DynamicImage) -> Result<PixelBuffer> {
    let (width, height) = (img.width(), img.height());

    if has_alpha_channel(&img) {
        PixelBuffer::new(width, height, ChannelLayout::Rgba8, img.into_rgba8().into_raw())
    } else {
        PixelBuffer::new(width, height, ChannelLayout::Rgb8, img.into_rgb8().into_raw())
    }
}
