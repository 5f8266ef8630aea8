//! End-to-end compression through the standard codec backends.

mod common;

use imgpress_engine::{
    CanonicalFormat, ChannelLayout, CompressionRequest, Compressor, EngineConfig, ErrorKind,
    ImageDecoder, StandardDecoder, FORMAT_ALIASES,
};

fn compressor() -> Compressor {
    Compressor::new(&EngineConfig::default())
}

#[test]
fn test_png_to_jpg_end_to_end() {
    let input = common::png(10, 10);
    let result = compressor()
        .compress(&CompressionRequest::new(input.clone(), "jpg", 80))
        .unwrap();

    assert_eq!(result.format_used, CanonicalFormat::Jpeg);
    assert!(!result.is_substituted());
    assert_eq!(result.quality_used, 80);
    assert!(result.stats.compressed_size > 0);
    assert_eq!(result.stats.compressed_size, result.data.len() as u64);
    assert_eq!(result.stats.original_size, input.len() as u64);
    assert!(result.stats.reduction_percent.is_finite());
    assert!(result.data.starts_with(&[0xFF, 0xD8, 0xFF]));
}

#[test]
fn test_avif_falls_back_to_webp() {
    let result = compressor()
        .compress(&CompressionRequest::new(common::png(8, 8), "avif", 60))
        .unwrap();

    assert_eq!(result.format_used, CanonicalFormat::Webp);
    assert_eq!(result.requested_format, "avif");
    let substitution = result.substitution.unwrap();
    assert_eq!(substitution.requested, CanonicalFormat::Avif);
    assert_eq!(substitution.used, CanonicalFormat::Webp);
    assert!(result.data.starts_with(b"RIFF"));
}

#[test]
fn test_every_alias_compresses() {
    let compressor = compressor();
    let input = common::png(6, 6);

    for alias in FORMAT_ALIASES {
        let result = compressor
            .compress(&CompressionRequest::new(input.clone(), alias.token.to_uppercase(), 70))
            .unwrap();
        assert!(result.stats.compressed_size > 0, "token {}", alias.token);
    }
}

#[test]
fn test_quality_bounds() {
    let compressor = compressor();
    let input = common::png(4, 4);

    for quality in [0, 101] {
        let err = compressor
            .compress(&CompressionRequest::new(input.clone(), "webp", quality))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput, "quality {}", quality);
    }

    for quality in [1, 100] {
        assert!(compressor
            .compress(&CompressionRequest::new(input.clone(), "webp", quality))
            .is_ok());
    }
}

#[test]
fn test_unsupported_format_before_decode() {
    // Garbage input: the format check must fail first
    let err = compressor()
        .compress(&CompressionRequest::new(b"junk".to_vec(), "tiff", 80))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedFormat);
    assert_eq!(err.detail.as_deref(), Some("tiff"));
}

#[test]
fn test_quality_checked_before_decode() {
    let err = compressor()
        .compress(&CompressionRequest::new(Vec::new(), "png", 0))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
}

#[test]
fn test_decode_failures() {
    let compressor = compressor();
    let png = common::png(8, 8);

    let mut corrupted = png.clone();
    // IHDR width field; the chunk CRC no longer matches
    corrupted[16..20].copy_from_slice(&[0x7F, 0xFF, 0xFF, 0xFF]);

    for input in [Vec::new(), png[..png.len() - 20].to_vec(), corrupted] {
        let err = compressor
            .compress(&CompressionRequest::new(input, "webp", 80))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DecodeError);
    }
}

#[test]
fn test_minimal_sources_decode() {
    let decoder = StandardDecoder::new();
    for (name, bytes) in [
        ("png", common::png(1, 1)),
        ("jpeg", common::jpeg(1, 1)),
        ("webp", common::webp(1, 1)),
        ("gif", common::gif(1, 1)),
    ] {
        let pixels = decoder.decode(&bytes).unwrap_or_else(|e| panic!("{}: {}", name, e));
        assert_eq!((pixels.width(), pixels.height()), (1, 1), "{}", name);
    }
}

#[test]
fn test_round_trip_own_format() {
    let compressor = compressor();
    let decoder = StandardDecoder::new();

    for (token, input) in [
        ("png", common::png(12, 7)),
        ("jpeg", common::jpeg(12, 7)),
        ("webp", common::webp(12, 7)),
    ] {
        let result = compressor
            .compress(&CompressionRequest::new(input, token, 85))
            .unwrap();
        let decoded = decoder.decode(&result.data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 7), "{}", token);
    }
}

#[test]
fn test_transparency_preserved_for_png_and_webp() {
    let compressor = compressor();
    let decoder = StandardDecoder::new();
    let input = common::png_with_alpha(5, 5);

    let png = compressor
        .compress(&CompressionRequest::new(input.clone(), "oxipng", 50))
        .unwrap();
    assert!(decoder.decode(&png.data).unwrap().has_transparency());

    let webp = compressor
        .compress(&CompressionRequest::new(input.clone(), "webp", 50))
        .unwrap();
    assert_eq!(webp.format_used, CanonicalFormat::Webp);
    let decoded = decoder.decode(&webp.data).unwrap();
    assert_eq!(decoded.layout(), ChannelLayout::Rgba8);
    assert!(decoded.has_transparency());

    let jpeg = compressor
        .compress(&CompressionRequest::new(input, "mozjpeg", 50))
        .unwrap();
    assert!(!decoder.decode(&jpeg.data).unwrap().has_transparency());
}

#[test]
fn test_filename_echoed_unmodified() {
    let result = compressor()
        .compress(
            &CompressionRequest::new(common::png(2, 2), "png", 80)
                .with_filename("Weird Name.tiff"),
        )
        .unwrap();
    assert_eq!(result.filename.as_deref(), Some("Weird Name.tiff"));
    assert_eq!(result.format_used, CanonicalFormat::Png);
}

#[test]
fn test_response_document() {
    let result = compressor()
        .compress(&CompressionRequest::new(common::png(3, 3), "avif", 40))
        .unwrap();
    let json = serde_json::to_value(result.to_response()).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["format"], "WEBP");
    assert_eq!(json["requested_format"], "avif");
    assert_eq!(json["substitution"]["requested"], "AVIF");
    assert_eq!(json["quality"], 40);
    assert!(json["stats"]["compression_ratio"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_concurrent_compressions() {
    let compressor = compressor();
    let inputs: Vec<Vec<u8>> = (1..=8).map(|n| common::png(n * 3, n * 2)).collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                let compressor = &compressor;
                let token = ["webp", "jpg", "png"][i % 3];
                scope.spawn(move || {
                    compressor
                        .compress(&CompressionRequest::new(input.clone(), token, 75))
                        .map(|r| r.format_used)
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
    });
}
