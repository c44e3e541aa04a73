// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the cardgate-vision pipeline. Covers the full
// decode-and-validate path on a phone-sized photo and the analyzers alone
// on the downsampled working copy.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use cardgate_vision::analysis::{analyze_shape, laplacian_variance};
use cardgate_vision::image::downsample;
use cardgate_vision::{CardValidator, PixelBuffer, ValidationThresholds};

#[path = "../tests/common/mod.rs"]
mod common;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Full pipeline on a 1200x1680 PNG of a synthetic card. Dominated by PNG
/// decoding and the downsample; the analyzers see a 214x300 copy.
fn bench_validate_bytes(c: &mut Criterion) {
    let bytes = common::png(&common::card_photo(1200, 1680, 1));
    let validator = CardValidator::default();

    c.bench_function("validate_bytes (1200x1680 png)", |b| {
        b.iter(|| black_box(validator.validate_bytes(black_box(&bytes))));
    });
}

/// Edge/shape heuristic and Laplacian variance on the working copy only.
fn bench_analyzers(c: &mut Criterion) {
    let thresholds = ValidationThresholds::default();
    let photo = PixelBuffer::from_image(common::card_photo(600, 840, 1));
    let gray = downsample(&photo, thresholds.downsample_max_side).to_grayscale();

    c.bench_function("analyze_shape (214x300)", |b| {
        b.iter(|| black_box(analyze_shape(black_box(&gray), &thresholds)));
    });

    c.bench_function("laplacian_variance (214x300)", |b| {
        b.iter(|| black_box(laplacian_variance(black_box(&gray))));
    });
}

criterion_group!(benches, bench_validate_bytes, bench_analyzers);
criterion_main!(benches);
