//! Decoded raster data handed from decoder to encoder.

use crate::{CompressionError, Result};

/// Channel layout of a [`PixelBuffer`]. Always 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// Opaque RGB
    Rgb8,
    /// RGB with straight (non-premultiplied) alpha
    Rgba8,
}

impl ChannelLayout {
    /// Bytes per pixel.
    pub fn channels(&self) -> usize {
        match self {
            ChannelLayout::Rgb8 => 3,
            ChannelLayout::Rgba8 => 4,
        }
    }

    /// Whether the layout carries alpha.
    pub fn has_alpha(&self) -> bool {
        matches!(self, ChannelLayout::Rgba8)
    }
}

/// Row-major, tightly packed pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw bytes, checking the length against the dimensions.
    pub fn new(width: u32, height: u32, layout: ChannelLayout, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(layout.channels()))
            .ok_or_else(|| {
                CompressionError::invalid_input("Image dimensions overflow")
                    .with_detail(format!("{}x{}", width, height))
            })?;

        if data.len() != expected {
            return Err(CompressionError::invalid_input("Pixel data does not match dimensions")
                .with_detail(format!(
                    "{}x{} {:?} needs {} bytes, got {}",
                    width,
                    height,
                    layout,
                    expected,
                    data.len()
                )));
        }

        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// A buffer with no pixels.
    pub fn empty(layout: ChannelLayout) -> Self {
        Self {
            width: 0,
            height: 0,
            layout,
            data: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// True when width or height is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when at least one pixel is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        match self.layout {
            ChannelLayout::Rgb8 => false,
            ChannelLayout::Rgba8 => self.data.chunks_exact(4).any(|px| px[3] != 255),
        }
    }

    /// Canvas to hand to codecs: a zero-area raster becomes one fully
    /// transparent pixel, since no container can express a zero extent.
    pub(crate) fn encodable(&self) -> std::borrow::Cow<'_, PixelBuffer> {
        if self.is_empty() {
            std::borrow::Cow::Owned(Self {
                width: 1,
                height: 1,
                layout: ChannelLayout::Rgba8,
                data: vec![0, 0, 0, 0],
            })
        } else {
            std::borrow::Cow::Borrowed(self)
        }
    }

    /// Same pixels as RGBA, adding an opaque alpha channel if needed.
    pub fn to_rgba(&self) -> Vec<u8> {
        match self.layout {
            ChannelLayout::Rgba8 => self.data.clone(),
            ChannelLayout::Rgb8 => self
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 255])
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_checked() {
        assert!(PixelBuffer::new(2, 2, ChannelLayout::Rgb8, vec![0; 12]).is_ok());
        assert!(PixelBuffer::new(2, 2, ChannelLayout::Rgba8, vec![0; 12]).is_err());
        assert!(PixelBuffer::new(0, 5, ChannelLayout::Rgba8, Vec::new()).is_ok());
    }

    #[test]
    fn test_transparency_detection() {
        let opaque = PixelBuffer::new(1, 1, ChannelLayout::Rgba8, vec![1, 2, 3, 255]).unwrap();
        let translucent = PixelBuffer::new(1, 1, ChannelLayout::Rgba8, vec![1, 2, 3, 10]).unwrap();
        assert!(!opaque.has_transparency());
        assert!(translucent.has_transparency());
    }

    #[test]
    fn test_empty_becomes_single_transparent_pixel() {
        let empty = PixelBuffer::empty(ChannelLayout::Rgb8);
        let canvas = empty.encodable();
        assert_eq!((canvas.width(), canvas.height()), (1, 1));
        assert_eq!(canvas.data(), &[0, 0, 0, 0]);
    }

    #[test]
    fn test_to_rgba_widens() {
        let rgb = PixelBuffer::new(1, 1, ChannelLayout::Rgb8, vec![9, 8, 7]).unwrap();
        assert_eq!(rgb.to_rgba(), vec![9, 8, 7, 255]);
    }
}
