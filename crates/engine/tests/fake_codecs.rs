//! Orchestration checked against scripted codec doubles.

use imgpress_engine::{
    CanonicalFormat, ChannelLayout, CodecSet, CompressionError, CompressionRequest, Compressor,
    EncodeFailure, EngineConfig, ErrorKind, FormatEncoder, ImageDecoder, PixelBuffer, Quality,
    Result,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Decodes anything into a 2x2 RGB raster and counts calls.
struct CountingDecoder {
    calls: Arc<AtomicUsize>,
}

impl ImageDecoder for CountingDecoder {
    fn decode(&self, _bytes: &[u8]) -> Result<PixelBuffer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        PixelBuffer::new(2, 2, ChannelLayout::Rgb8, vec![0; 12])
    }
}

/// Returns a fixed number of bytes, or fails.
struct ScriptedEncoder {
    format: CanonicalFormat,
    output_len: usize,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl FormatEncoder for ScriptedEncoder {
    fn format(&self) -> CanonicalFormat {
        self.format
    }

    fn encode(&self, pixels: &PixelBuffer, quality: Quality) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(!pixels.is_empty());
        assert!((1..=100).contains(&quality.get()));
        if self.fail {
            return Err(CompressionError::backend("scripted", "allocation failed"));
        }
        Ok(vec![0xAB; self.output_len])
    }
}

struct Harness {
    compressor: Compressor,
    decodes: Arc<AtomicUsize>,
    encodes: Arc<AtomicUsize>,
}

fn harness(config: EngineConfig, encoders: &[(CanonicalFormat, usize, bool)]) -> Harness {
    let decodes = Arc::new(AtomicUsize::new(0));
    let encodes = Arc::new(AtomicUsize::new(0));

    let mut codecs = CodecSet::standard(&config).with_decoder(Box::new(CountingDecoder {
        calls: Arc::clone(&decodes),
    }));
    for &(format, output_len, fail) in encoders {
        codecs = codecs.with_encoder(Box::new(ScriptedEncoder {
            format,
            output_len,
            fail,
            calls: Arc::clone(&encodes),
        }));
    }

    Harness {
        compressor: Compressor::with_codecs(&config, codecs),
        decodes,
        encodes,
    }
}

fn request(format: &str, quality: u32) -> CompressionRequest {
    CompressionRequest::new(vec![1; 1000], format, quality)
}

#[test]
fn test_stats_follow_encoder_output() {
    let h = harness(EngineConfig::default(), &[(CanonicalFormat::Jpeg, 400, false)]);
    let result = h.compressor.compress(&request("jpeg", 80)).unwrap();

    assert_eq!(result.stats.original_size, 1000);
    assert_eq!(result.stats.compressed_size, 400);
    assert_eq!(result.stats.reduction_display(), 60.0);
    assert_eq!(result.stats.compression_ratio, 2.5);
}

#[test]
fn test_growth_reported_negative() {
    let h = harness(EngineConfig::default(), &[(CanonicalFormat::Png, 2500, false)]);
    let result = h.compressor.compress(&request("png", 80)).unwrap();

    assert_eq!(result.stats.reduction_percent, -150.0);
    assert_eq!(result.stats.compression_ratio, 0.4);
}

#[test]
fn test_backend_failure_not_retried_or_substituted() {
    let h = harness(
        EngineConfig::default(),
        &[(CanonicalFormat::Webp, 10, true), (CanonicalFormat::Jpeg, 10, false)],
    );
    let err = h.compressor.compress(&request("webp", 80)).unwrap_err();

    assert_eq!(err.kind, ErrorKind::EncodeError);
    assert_eq!(err.encode_failure, Some(EncodeFailure::Backend));
    assert_eq!(err.detail.as_deref(), Some("allocation failed"));
    assert_eq!(h.encodes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_zero_byte_output_is_degenerate() {
    let h = harness(EngineConfig::default(), &[(CanonicalFormat::Png, 0, false)]);
    let err = h.compressor.compress(&request("oxipng", 80)).unwrap_err();

    assert_eq!(err.kind, ErrorKind::EncodeError);
    assert_eq!(err.encode_failure, Some(EncodeFailure::DegenerateOutput));
}

#[test]
fn test_cheap_checks_skip_decode() {
    let h = harness(EngineConfig::default(), &[]);

    assert_eq!(
        h.compressor.compress(&request("heic", 80)).unwrap_err().kind,
        ErrorKind::UnsupportedFormat
    );
    assert_eq!(
        h.compressor.compress(&request("webp", 101)).unwrap_err().kind,
        ErrorKind::InvalidInput
    );
    assert_eq!(h.decodes.load(Ordering::SeqCst), 0);
}

#[test]
fn test_native_avif_when_enabled_and_wired() {
    let config = EngineConfig {
        avif_native_supported: true,
        ..EngineConfig::default()
    };
    let h = harness(config, &[(CanonicalFormat::Avif, 123, false)]);
    let result = h.compressor.compress(&request("AVIF", 50)).unwrap();

    assert_eq!(result.format_used, CanonicalFormat::Avif);
    assert!(result.substitution.is_none());
    assert_eq!(result.data.len(), 123);
}

#[test]
fn test_avif_encoder_ignored_when_flag_off() {
    let h = harness(
        EngineConfig::default(),
        &[(CanonicalFormat::Avif, 123, false), (CanonicalFormat::Webp, 77, false)],
    );
    let result = h.compressor.compress(&request("avif", 50)).unwrap();

    assert_eq!(result.format_used, CanonicalFormat::Webp);
    assert!(result.is_substituted());
    assert_eq!(result.data.len(), 77);
}

#[test]
fn test_resolution_is_stable() {
    let h = harness(EngineConfig::default(), &[(CanonicalFormat::Jpeg, 5, false)]);
    let first = h.compressor.compress(&request("mozjpeg", 10)).unwrap();
    let second = h.compressor.compress(&request("mozjpeg", 10)).unwrap();

    assert_eq!(first.format_used, second.format_used);
    assert_eq!(first.stats, second.stats);
    assert_eq!(h.decodes.load(Ordering::SeqCst), 2);
}
