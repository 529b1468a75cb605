// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the capture hot paths: rasterising a camera frame
// to JPEG, and pre-filling a form from an extraction result.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use fretdoc_capture::{ImageProcessor, prefill};
use fretdoc_core::form::{FormDomain, FormState};
use fretdoc_core::types::{DocumentType, ExtractionResult, VideoFrame};

/// 1280x720 synthetic frame: a light card on a dark desk.
fn synthetic_frame() -> VideoFrame {
    let (width, height) = (1280u32, 720u32);
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let on_card = (200..1080).contains(&x) && (120..600).contains(&y);
            let v = if on_card { 235 } else { 40 };
            rgba.extend_from_slice(&[v, v, v, 255]);
        }
    }
    VideoFrame {
        width,
        height,
        rgba,
    }
}

fn bench_frame_to_jpeg(c: &mut Criterion) {
    let frame = synthetic_frame();
    c.bench_function("frame_to_jpeg (1280x720, q95)", |b| {
        b.iter(|| {
            let jpeg = ImageProcessor::from_frame(black_box(frame.clone()))
                .and_then(|p| p.to_jpeg_bytes(95));
            black_box(jpeg.ok());
        });
    });
}

fn bench_prefill(c: &mut Criterion) {
    let form = FormState::new(FormDomain::Vehicle);
    let result = ExtractionResult::from_pairs(
        DocumentType::VehicleRegistration,
        [
            ("immatriculation", "1234 ABC 75"),
            ("marque", "TOYOTA"),
            ("modele", "HILUX"),
            ("annee", "2018"),
            ("numero_chassis", "MR0FZ29G401234567"),
        ],
        None,
    );

    c.bench_function("prefill (vehicle, aliases)", |b| {
        b.iter(|| black_box(prefill(black_box(&form), black_box(&result))));
    });
}

criterion_group!(benches, bench_frame_to_jpeg, bench_prefill);
criterion_main!(benches);
