//! # Validation Configuration Module
//!
//! Provides configurable validation parameters to avoid hardcoded values
//! and enable deployment-specific tuning.

use fragment_types::detector;
use serde::{Deserialize, Serialize};

/// Validation configuration for different deployment environments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ValidationConfig {
    /// Plausibility limits for detector records
    pub detector: DetectorLimits,

    /// Diagnostic output settings
    pub dump: DumpConfig,
}

/// Plausibility limits applied by the detector validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorLimits {
    /// Largest hit count a header may declare
    pub max_hits: u8,
    /// Number of channels on a module; valid channels are `0..channel_count`
    pub channel_count: u8,
    /// Meaningful ADC bits; valid samples are `0..2^adc_bits`
    pub adc_bits: u32,
    /// Earliest unix time a record may carry
    pub min_unix_time: i32,
    /// Expected header marker byte
    pub header_magic: u8,
    /// Expected hit marker byte
    pub hit_magic: u8,
}

impl Default for DetectorLimits {
    fn default() -> Self {
        Self {
            max_hits: detector::CHANNEL_COUNT as u8,
            channel_count: detector::CHANNEL_COUNT as u8,
            adc_bits: detector::ADC_BITS,
            min_unix_time: detector::MIN_UNIX_TIME,
            header_magic: detector::HEADER_MAGIC,
            hit_magic: detector::HIT_MAGIC,
        }
    }
}

impl DetectorLimits {
    /// Exclusive upper bound of a valid ADC sample
    pub fn adc_limit(&self) -> i32 {
        1i32 << self.adc_bits.min(15)
    }
}

/// Diagnostic dump configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Most hits rendered by a record dump
    pub max_hits: usize,
    /// Log a hex/ASCII dump of the record when its size is inconsistent
    pub raw_dump_on_size_mismatch: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            max_hits: detector::CHANNEL_COUNT,
            raw_dump_on_size_mismatch: true,
        }
    }
}

impl ValidationConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        // Override from environment if set
        if let Ok(val) = std::env::var("FRAGMENT_MIN_UNIX_TIME") {
            if let Ok(time) = val.parse() {
                config.detector.min_unix_time = time;
            }
        }

        if let Ok(val) = std::env::var("FRAGMENT_MAX_HITS") {
            if let Ok(hits) = val.parse() {
                config.detector.max_hits = hits;
            }
        }

        if let Ok(val) = std::env::var("FRAGMENT_ADC_BITS") {
            if let Ok(bits) = val.parse() {
                config.detector.adc_bits = bits;
            }
        }

        if let Ok(val) = std::env::var("FRAGMENT_DUMP_MAX_HITS") {
            if let Ok(hits) = val.parse() {
                config.dump.max_hits = hits;
            }
        }

        config
    }

    /// Parse configuration from a TOML document; missing keys keep their defaults
    pub fn from_toml_str(document: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(document)
    }

    /// Production configuration: full limits, raw dumps on size mismatch
    pub fn production() -> Self {
        Self::default()
    }

    /// Development configuration for replaying simulated data
    pub fn development() -> Self {
        Self {
            detector: DetectorLimits {
                // Simulated records may carry arbitrary timestamps
                min_unix_time: 0,
                ..DetectorLimits::default()
            },
            dump: DumpConfig {
                max_hits: 8,
                raw_dump_on_size_mismatch: false,
            },
        }
    }
}
