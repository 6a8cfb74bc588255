//! # Detector Record Validator
//!
//! ## Purpose
//!
//! Decides whether a received detector record is structurally plausible
//! before anything downstream trusts it. Checks run in layers, each assuming
//! the previous ones passed:
//!
//! ```text
//! size_sufficient → size_consistent → header_sane → hits_sane
//!   extent ≥ 12B     extent matches     marker 'M'     marker 'H'
//!                    nhit, rounded      0 < nhit ≤ 64  channel < 64
//!                                       time ≥ floor   0 ≤ adc < 4096
//! ```
//!
//! The boolean layer methods and [`DetectorValidator::is_good_event`] mirror
//! the acquisition software's go/no-go decision and log a warning for each
//! failure. [`DetectorValidator::check`] returns the first failure as a typed
//! error; [`DetectorValidator::report`] collects every issue it can find.

use std::fmt;

use fragment_types::detector::{self, DetectorHeader, DetectorHit};
use fragment_types::FragmentBuffer;
use thiserror::Error;
use tracing::{trace, warn};
use zerocopy::FromBytes;

use super::config::ValidationConfig;
use crate::dump::HexDump;
use crate::overlay::detector::hit_at;

/// Validation layer, in the order layers are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValidationLayer {
    SizeSufficient,
    SizeConsistent,
    HeaderSane,
    HitsSane,
}

impl fmt::Display for ValidationLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValidationLayer::SizeSufficient => "size_sufficient",
            ValidationLayer::SizeConsistent => "size_consistent",
            ValidationLayer::HeaderSane => "header_sane",
            ValidationLayer::HitsSane => "hits_sane",
        };
        f.write_str(name)
    }
}

/// Structural problems found in a detector record
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Record too small: {got} bytes, need at least {need} for the header")]
    TooSmallForHeader { got: usize, need: usize },

    #[error("Record size {got} bytes inconsistent with {nhit} hits: expected {expected} bytes")]
    SizeMismatch {
        got: usize,
        expected: usize,
        nhit: u8,
    },

    #[error("Bad header marker 0x{observed:02x}, expected 0x{expected:02x}")]
    BadHeaderMagic { observed: u8, expected: u8 },

    #[error("Hit count {nhit} outside 1..={max}")]
    HitCountOutOfRange { nhit: u8, max: u8 },

    #[error("Unix time {unixtime} earlier than {min}")]
    TimestampTooEarly { unixtime: i32, min: i32 },

    #[error("Hit {index} lies past the end of a {buffer_bytes}-byte record")]
    HitPastEnd { index: usize, buffer_bytes: usize },

    #[error("Hit {index}: bad marker 0x{observed:02x}, expected 0x{expected:02x}")]
    BadHitMagic {
        index: usize,
        observed: u8,
        expected: u8,
    },

    #[error("Hit {index}: channel {channel} outside 0..{limit}")]
    ChannelOutOfRange { index: usize, channel: u8, limit: u8 },

    #[error("Hit {index}: ADC value {adc} outside 0..{limit}")]
    AdcOutOfRange { index: usize, adc: i16, limit: i32 },
}

impl ValidationError {
    /// Layer that raised this error
    pub fn layer(&self) -> ValidationLayer {
        match self {
            ValidationError::TooSmallForHeader { .. } => ValidationLayer::SizeSufficient,
            ValidationError::SizeMismatch { .. } => ValidationLayer::SizeConsistent,
            ValidationError::BadHeaderMagic { .. }
            | ValidationError::HitCountOutOfRange { .. }
            | ValidationError::TimestampTooEarly { .. } => ValidationLayer::HeaderSane,
            ValidationError::HitPastEnd { .. }
            | ValidationError::BadHitMagic { .. }
            | ValidationError::ChannelOutOfRange { .. }
            | ValidationError::AdcOutOfRange { .. } => ValidationLayer::HitsSane,
        }
    }
}

/// Every issue found in one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationError>,
    /// Layers that could not run because an earlier layer's precondition failed
    pub skipped: Vec<ValidationLayer>,
}

impl ValidationReport {
    /// No issues and no skipped layers
    pub fn is_good(&self) -> bool {
        self.issues.is_empty() && self.skipped.is_empty()
    }

    /// Issues raised by `layer`
    pub fn issues_in(&self, layer: ValidationLayer) -> impl Iterator<Item = &ValidationError> {
        self.issues.iter().filter(move |issue| issue.layer() == layer)
    }

    /// Distinct layers with at least one issue, in layer order
    pub fn failed_layers(&self) -> Vec<ValidationLayer> {
        let mut layers: Vec<_> = self.issues.iter().map(ValidationError::layer).collect();
        layers.sort();
        layers.dedup();
        layers
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_good() {
            return f.write_str("record is good");
        }
        for issue in &self.issues {
            writeln!(f, "[{}] {}", issue.layer(), issue)?;
        }
        for layer in &self.skipped {
            writeln!(f, "[{}] skipped", layer)?;
        }
        Ok(())
    }
}

/// Layered structural validator for one detector record
pub struct DetectorValidator<'a, B: FragmentBuffer> {
    buffer: &'a B,
    config: ValidationConfig,
}

impl<'a, B: FragmentBuffer> DetectorValidator<'a, B> {
    /// Validator with the default limits
    pub fn new(buffer: &'a B) -> Self {
        Self::with_config(buffer, ValidationConfig::default())
    }

    pub fn with_config(buffer: &'a B, config: ValidationConfig) -> Self {
        Self { buffer, config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    fn bytes(&self) -> &'a [u8] {
        self.buffer.payload_bytes()
    }

    fn header(&self) -> Option<&'a DetectorHeader> {
        self.bytes()
            .get(..detector::HEADER_BYTES)
            .and_then(DetectorHeader::ref_from)
    }

    /// Buffer extent a record with `nhit` hits must have
    pub fn expected_size(nhit: u8) -> usize {
        B::round_up(detector::record_bytes(usize::from(nhit)))
    }

    /// Layer 1: the extent can hold a header
    pub fn check_size_sufficient(&self) -> Result<&'a DetectorHeader, ValidationError> {
        self.header().ok_or(ValidationError::TooSmallForHeader {
            got: self.bytes().len(),
            need: detector::HEADER_BYTES,
        })
    }

    /// Layer 2: the extent matches the declared hit count after allocation rounding
    pub fn check_size_consistent(&self) -> Result<(), ValidationError> {
        let header = self.check_size_sufficient()?;
        let got = self.bytes().len();
        let expected = Self::expected_size(header.nhit());
        if got != expected {
            return Err(ValidationError::SizeMismatch {
                got,
                expected,
                nhit: header.nhit(),
            });
        }
        Ok(())
    }

    fn header_issues(&self, header: &DetectorHeader) -> Vec<ValidationError> {
        let limits = &self.config.detector;
        let mut issues = Vec::new();

        if header.magic() != limits.header_magic {
            issues.push(ValidationError::BadHeaderMagic {
                observed: header.magic(),
                expected: limits.header_magic,
            });
        }
        if header.nhit() == 0 || header.nhit() > limits.max_hits {
            issues.push(ValidationError::HitCountOutOfRange {
                nhit: header.nhit(),
                max: limits.max_hits,
            });
        }
        if header.unixtime() < limits.min_unix_time {
            issues.push(ValidationError::TimestampTooEarly {
                unixtime: header.unixtime(),
                min: limits.min_unix_time,
            });
        }
        issues
    }

    /// Layer 3: header marker, hit count and timestamp are plausible
    pub fn check_header_sane(&self) -> Result<(), ValidationError> {
        let header = self.check_size_sufficient()?;
        match self.header_issues(header).into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }

    fn hit_issues(&self, index: usize, hit: &DetectorHit) -> Vec<ValidationError> {
        let limits = &self.config.detector;
        let mut issues = Vec::new();

        if hit.magic() != limits.hit_magic {
            issues.push(ValidationError::BadHitMagic {
                index,
                observed: hit.magic(),
                expected: limits.hit_magic,
            });
        }
        if hit.channel() >= limits.channel_count {
            issues.push(ValidationError::ChannelOutOfRange {
                index,
                channel: hit.channel(),
                limit: limits.channel_count,
            });
        }
        let adc = hit.adc_signed();
        if !(0..limits.adc_limit()).contains(&i32::from(adc)) {
            issues.push(ValidationError::AdcOutOfRange {
                index,
                adc,
                limit: limits.adc_limit(),
            });
        }
        issues
    }

    fn hit(&self, index: usize) -> Result<&'a DetectorHit, ValidationError> {
        hit_at(self.bytes(), index).map_err(|_| ValidationError::HitPastEnd {
            index,
            buffer_bytes: self.bytes().len(),
        })
    }

    /// Layer 4: every declared hit has a marker, channel and ADC value in range
    pub fn check_hits_sane(&self) -> Result<(), ValidationError> {
        let header = self.check_size_sufficient()?;
        let nhit = usize::from(header.nhit());
        trace!(nhit, "scanning detector hits");
        for index in 0..nhit {
            let hit = self.hit(index)?;
            if let Some(issue) = self.hit_issues(index, hit).into_iter().next() {
                return Err(issue);
            }
        }
        Ok(())
    }

    fn log_failure(&self, error: &ValidationError) {
        warn!(
            layer = %error.layer(),
            buffer_bytes = self.bytes().len(),
            error = %error,
            "detector record failed validation"
        );
    }

    fn passes(&self, result: Result<(), ValidationError>) -> bool {
        match result {
            Ok(()) => true,
            Err(error) => {
                self.log_failure(&error);
                false
            }
        }
    }

    pub fn size_sufficient(&self) -> bool {
        self.passes(self.check_size_sufficient().map(|_| ()))
    }

    /// On mismatch, also logs a hex dump of the record when configured to
    pub fn size_consistent(&self) -> bool {
        let result = self.check_size_consistent();
        let mismatch = matches!(result, Err(ValidationError::SizeMismatch { .. }));
        let passed = self.passes(result);
        if mismatch && self.config.dump.raw_dump_on_size_mismatch {
            warn!("record bytes:\n{}", HexDump(self.bytes()));
        }
        passed
    }

    pub fn header_sane(&self) -> bool {
        self.passes(self.check_header_sane())
    }

    pub fn hits_sane(&self) -> bool {
        self.passes(self.check_hits_sane())
    }

    /// All four layers in order, stopping at the first failure
    pub fn is_good_event(&self) -> bool {
        self.size_sufficient() && self.size_consistent() && self.header_sane() && self.hits_sane()
    }

    /// First failure as a typed error, layers in order
    pub fn check(&self) -> Result<(), ValidationError> {
        self.check_size_sufficient()?;
        self.check_size_consistent()?;
        self.check_header_sane()?;
        self.check_hits_sane()
    }

    /// Every issue that can be found without reading outside the buffer
    ///
    /// Without a header nothing else can run. Otherwise all header issues are
    /// collected, and every declared hit that lies inside the buffer is checked.
    pub fn report(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        let header = match self.check_size_sufficient() {
            Ok(header) => header,
            Err(error) => {
                report.issues.push(error);
                report.skipped = vec![
                    ValidationLayer::SizeConsistent,
                    ValidationLayer::HeaderSane,
                    ValidationLayer::HitsSane,
                ];
                return report;
            }
        };

        if let Err(error) = self.check_size_consistent() {
            report.issues.push(error);
        }
        report.issues.extend(self.header_issues(header));

        for index in 0..usize::from(header.nhit()) {
            match self.hit(index) {
                Ok(hit) => report.issues.extend(self.hit_issues(index, hit)),
                Err(error) => {
                    report.issues.push(error);
                    break;
                }
            }
        }
        report
    }
}
