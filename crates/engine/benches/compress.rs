//! Benchmarks for the compression pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use imgpress_engine::{CompressionRequest, Compressor, EngineConfig, FormatResolver, Stats};
use std::io::Cursor;

fn png_fixture(size: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(size, size, |x, y| {
        image::Rgb([(x * 3) as u8, (y * 5) as u8, ((x + y) * 7) as u8])
    });
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, ImageOutputFormat::Png)
        .unwrap();
    buffer.into_inner()
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = FormatResolver::new(false);
    c.bench_function("resolve_alias", |b| b.iter(|| resolver.resolve(black_box("MozJPEG"))));
    c.bench_function("stats_compute", |b| {
        b.iter(|| Stats::compute(black_box(1_048_576), black_box(262_144)))
    });
}

fn bench_compress(c: &mut Criterion) {
    let compressor = Compressor::new(&EngineConfig::default());
    let input = png_fixture(128);
    let mut group = c.benchmark_group("compress_128px");

    for format in ["webp", "jpg", "png"] {
        let request = CompressionRequest::new(input.clone(), format, 80);
        group.bench_with_input(BenchmarkId::from_parameter(format), &request, |b, request| {
            b.iter(|| compressor.compress(black_box(request)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_compress);
criterion_main!(benches);
