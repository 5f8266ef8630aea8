//! In-memory fixtures shared by the integration tests.

#![allow(dead_code)]

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

fn write(img: DynamicImage, format: ImageOutputFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

fn opaque(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x * 25) as u8, (y * 25) as u8, 128]))
}

/// Opaque PNG with a small gradient.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    write(DynamicImage::ImageRgb8(opaque(width, height)), ImageOutputFormat::Png)
}

/// PNG with a translucent alpha channel.
pub fn png_with_alpha(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, _| Rgba([255, 0, 0, (x * 40) as u8]));
    write(DynamicImage::ImageRgba8(img), ImageOutputFormat::Png)
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    write(DynamicImage::ImageRgb8(opaque(width, height)), ImageOutputFormat::Jpeg(90))
}

/// Lossy WebP produced by libwebp.
pub fn webp(width: u32, height: u32) -> Vec<u8> {
    let img = opaque(width, height);
    webp::Encoder::from_rgb(img.as_raw(), width, height)
        .encode(90.0)
        .to_vec()
}

pub fn gif(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([0, 128, 255, 255]));
    write(DynamicImage::ImageRgba8(img), ImageOutputFormat::Gif)
}
