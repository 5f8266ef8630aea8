//! Alpha flattening for containers without transparency.

use crate::pixels::{ChannelLayout, PixelBuffer};

/// Default background for flattening (white).
pub const DEFAULT_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Composite one channel over the background.
///
/// Integer form of `round(src * a/255 + bg * (1 - a/255))`. The divisor is
/// odd so no value lands exactly on .5.
#[inline]
fn blend(src: u8, bg: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    ((u32::from(src) * a + u32::from(bg) * (255 - a) + 127) / 255) as u8
}

/// Packed RGB bytes for `pixels`, compositing any alpha over `background`.
pub fn flatten_to_rgb(pixels: &PixelBuffer, background: [u8; 3]) -> Vec<u8> {
    match pixels.layout() {
        ChannelLayout::Rgb8 => pixels.data().to_vec(),
        ChannelLayout::Rgba8 => {
            let mut output = Vec::with_capacity(pixels.data().len() / 4 * 3);
            for px in pixels.data().chunks_exact(4) {
                let alpha = px[3];
                output.push(blend(px[0], background[0], alpha));
                output.push(blend(px[1], background[1], alpha));
                output.push(blend(px[2], background[2], alpha));
            }
            output
        }
    }
}
