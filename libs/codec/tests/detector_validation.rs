//! Detector validator soundness on hand-built records
//!
//! Records are assembled byte by byte rather than through the writer, so the
//! validator is tested against exactly what would arrive off the wire.

use fragment_codec::{
    dump_hit, dump_hits, DetectorValidator, ValidationConfig, ValidationError, ValidationLayer,
};
use fragment_types::{detector::DetectorHit, DetectorHeader, Fragment};
use zerocopy::AsBytes;

const PLAUSIBLE_TIME: i32 = 1_650_000_000;

fn raw_record(header: DetectorHeader, hits: &[DetectorHit]) -> Vec<u8> {
    let mut bytes = header.as_bytes().to_vec();
    for hit in hits {
        bytes.extend_from_slice(hit.as_bytes());
    }
    bytes
}

fn fragment(header: DetectorHeader, hits: &[DetectorHit]) -> Fragment {
    Fragment::from_payload_bytes(&raw_record(header, hits))
}

fn good_hits() -> Vec<DetectorHit> {
    vec![
        DetectorHit::new(0, 0),
        DetectorHit::new(31, 2048),
        DetectorHit::new(63, 4095),
    ]
}

#[test]
fn test_plausible_record_passes_every_layer() {
    let fragment = fragment(DetectorHeader::new(3, 2, PLAUSIBLE_TIME, 77), &good_hits());
    let validator = DetectorValidator::new(&fragment);

    assert!(validator.size_sufficient());
    assert!(validator.size_consistent());
    assert!(validator.header_sane());
    assert!(validator.hits_sane());
    assert!(validator.is_good_event());
}

#[test]
fn test_hit_count_limits() {
    let empty = fragment(DetectorHeader::new(0, 2, PLAUSIBLE_TIME, 0), &[]);
    assert!(!DetectorValidator::new(&empty).header_sane());

    let hits: Vec<_> = (0..65).map(|i| DetectorHit::new(i % 64, 1)).collect();
    let crowded = fragment(DetectorHeader::new(65, 2, PLAUSIBLE_TIME, 0), &hits);
    let validator = DetectorValidator::new(&crowded);
    assert!(validator.size_consistent());
    assert_eq!(
        validator.check(),
        Err(ValidationError::HitCountOutOfRange { nhit: 65, max: 64 })
    );
}

#[test]
fn test_out_of_range_hits_fail() {
    let mut hits = good_hits();
    hits[1] = DetectorHit::new(64, 100);
    let record = fragment(DetectorHeader::new(3, 2, PLAUSIBLE_TIME, 0), &hits);
    assert!(!DetectorValidator::new(&record).hits_sane());

    let mut hits = good_hits();
    hits[2] = DetectorHit::new(10, 4096);
    let record = fragment(DetectorHeader::new(3, 2, PLAUSIBLE_TIME, 0), &hits);
    let validator = DetectorValidator::new(&record);
    assert!(validator.header_sane());
    assert!(!validator.hits_sane());
    assert_eq!(validator.check().unwrap_err().layer(), ValidationLayer::HitsSane);
}

#[test]
fn test_size_mismatch_fails_regardless_of_content() {
    // Declares 3 hits but carries 5; 32 bytes versus 24 expected
    let mut hits = good_hits();
    hits.extend([DetectorHit::new(1, 1), DetectorHit::new(2, 2)]);
    let record = fragment(DetectorHeader::new(3, 2, PLAUSIBLE_TIME, 0), &hits);

    let validator = DetectorValidator::new(&record);
    assert!(!validator.size_consistent());
    assert!(validator.header_sane());
    assert!(validator.hits_sane());
    assert!(!validator.is_good_event());
    assert_eq!(
        validator.check(),
        Err(ValidationError::SizeMismatch {
            got: 32,
            expected: 24,
            nhit: 3
        })
    );
}

#[test]
fn test_short_buffer_fails_first_layer() {
    let record = Fragment::from_payload_bytes(b"MH");
    let validator = DetectorValidator::new(&record);
    assert!(!validator.size_sufficient());
    assert!(!validator.is_good_event());
    assert_eq!(
        validator.check(),
        Err(ValidationError::TooSmallForHeader { got: 8, need: 12 })
    );
}

#[test]
fn test_truncated_record_reports_hit_past_end() {
    // Claims 4 hits, carries 1
    let record = fragment(DetectorHeader::new(4, 2, PLAUSIBLE_TIME, 0), &good_hits()[..1]);
    let validator = DetectorValidator::new(&record);

    assert!(!validator.hits_sane());
    let report = validator.report();
    assert!(report
        .issues
        .iter()
        .any(|issue| matches!(issue, ValidationError::HitPastEnd { index: 1, .. })));

    assert!(dump_hit(&record, 3).contains("would be past end"));
    assert!(dump_hits(&record, 64).lines().any(|line| line.contains("would be past end")));
}

#[test]
fn test_limits_from_toml() {
    let config = ValidationConfig::from_toml_str(
        r#"
        [detector]
        max_hits = 2
        "#,
    )
    .unwrap();
    let record = fragment(DetectorHeader::new(3, 2, PLAUSIBLE_TIME, 0), &good_hits());

    assert!(DetectorValidator::new(&record).is_good_event());
    assert!(!DetectorValidator::with_config(&record, config).is_good_event());
}
