//! Image recompression engine.
//!
//! This crate provides:
//! - Format token resolution with alias and AVIF fallback rules
//! - Decoding of PNG, JPEG, WebP and GIF sources
//! - Encoding to WebP, JPEG, PNG (oxipng) and optionally AVIF
//! - Size statistics for each compression
//!
//! # Example
//!
//! ```no_run
//! use imgpress_engine::{CompressionRequest, Compressor, EngineConfig};
//!
//! let compressor = Compressor::new(&EngineConfig::default());
//! let bytes = std::fs::read("photo.png").unwrap();
//!
//! let result = compressor
//!     .compress(&CompressionRequest::new(bytes, "webp", 80))
//!     .unwrap();
//! println!("{} -> {}% smaller", result.format_used, result.stats.reduction_display());
//! ```

mod alpha;
mod compressor;
mod detect;
mod error;
mod format;
mod pixels;
mod quality;
mod stats;

pub mod config;
pub mod decode;
pub mod encode;
pub mod payload;

pub use alpha::{flatten_to_rgb, DEFAULT_BACKGROUND};
pub use compressor::{
    CompressionRequest, CompressionResponse, CompressionResult, Compressor, FormatInfo,
    Substitution,
};
pub use config::{ConfigError, EngineConfig};
pub use decode::{ImageDecoder, StandardDecoder};
pub use detect::{detect_source_format, SourceFormat};
pub use encode::{encode, CodecSet, FormatEncoder};
pub use error::{CompressionError, EncodeFailure, ErrorKind, ErrorReport, Result};
pub use format::{
    lookup_alias, CanonicalFormat, FormatAlias, FormatResolver, Resolution, FORMAT_ALIASES,
};
pub use payload::{decode_base64, encode_base64, output_filename};
pub use pixels::{ChannelLayout, PixelBuffer};
pub use quality::{Quality, QualityScale, MAX_QUALITY, MIN_QUALITY};
pub use stats::Stats;
