//! Throughput of detector validation and overlay access
//!
//! Validation sits on the acquisition path for every module readout, so the
//! accepting path must stay cheap. Failure paths allocate a diagnostic and
//! are measured separately.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fragment_codec::{
    DetectorFragmentWriter, DetectorValidator, ToyFragment, ToyFragmentWriter, ValidationConfig,
};
use fragment_types::{Fragment, ToyMetadata};

fn full_detector_record() -> Fragment {
    let hits: Vec<(u8, u16)> = (0..64u8).map(|ch| (ch, u16::from(ch) * 50)).collect();
    let mut fragment = Fragment::new();
    let mut writer = DetectorFragmentWriter::new(&mut fragment).expect("empty buffer");
    writer.set_unixtime(1_700_000_000).expect("header fits");
    writer.write_hits(&hits).expect("64 hits fit");
    fragment
}

fn bench_detector_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("detector_validation");

    let good = full_detector_record();
    group.bench_function("is_good_event_64_hits", |b| {
        b.iter(|| {
            let validator = DetectorValidator::new(black_box(&good));
            black_box(validator.is_good_event())
        });
    });

    group.bench_function("check_64_hits", |b| {
        b.iter(|| black_box(DetectorValidator::new(black_box(&good)).check()));
    });

    // Size mismatch with raw dumps disabled isolates the failure path
    let mut bad_bytes = good.clone().into_payload();
    bad_bytes.extend_from_slice(&[0u8; 8]);
    let bad = Fragment::from_payload_bytes(&bad_bytes);
    let quiet = ValidationConfig::development();
    group.bench_function("check_size_mismatch", |b| {
        b.iter(|| {
            let validator = DetectorValidator::with_config(black_box(&bad), quiet.clone());
            black_box(validator.check())
        });
    });

    group.bench_function("report_size_mismatch", |b| {
        b.iter(|| {
            let validator = DetectorValidator::with_config(black_box(&bad), quiet.clone());
            black_box(validator.report())
        });
    });

    group.finish();
}

fn bench_toy_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("toy_overlay");

    let samples: Vec<u16> = (0..4096u16).collect();
    let mut fragment = Fragment::with_metadata(&ToyMetadata::new(1, 12));
    ToyFragmentWriter::new(&mut fragment)
        .and_then(|mut writer| writer.write_adc_values(&samples))
        .expect("samples fit");

    group.bench_function("fast_verify_4096", |b| {
        b.iter(|| {
            let reader = ToyFragment::new(black_box(&fragment)).expect("header fits");
            black_box(reader.fast_verify(12))
        });
    });

    group.bench_function("write_4096", |b| {
        b.iter(|| {
            let mut fragment = Fragment::with_metadata(&ToyMetadata::new(1, 12));
            ToyFragmentWriter::new(&mut fragment)
                .and_then(|mut writer| writer.write_adc_values(black_box(&samples)))
                .expect("samples fit");
            black_box(fragment)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_detector_validation, bench_toy_overlay);
criterion_main!(benches);
