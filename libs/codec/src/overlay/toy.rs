//! Simulated ADC record overlays
//!
//! Samples are 16-bit, but only the low `num_adc_bits` carry data. A sample
//! with any bit set above that width is treated as corrupt.

use std::fmt;

use fragment_types::{AdcSample, FragmentBuffer, RecordLayout, ToyLayout};
use tracing::trace;

use super::{FragmentReader, FragmentWriter};
use crate::error::{OverlayError, OverlayResult};

/// Read-only ADC overlay
pub type ToyFragment<'a, B> = FragmentReader<'a, ToyLayout, B>;

/// Writable ADC overlay
pub type ToyFragmentWriter<'a, B> = FragmentWriter<'a, ToyLayout, B>;

/// Value returned by [`FragmentReader::adc_value_or_sentinel`] when a sample can't be read
pub const ADC_SENTINEL: u16 = 0xFFFF;

fn exceeds_width(value: u16, adc_bits: u32) -> bool {
    value.checked_shr(adc_bits).unwrap_or(0) != 0
}

impl<'a, B: FragmentBuffer> FragmentReader<'a, ToyLayout, B> {
    pub fn trigger_number(&self) -> u32 {
        self.header().trigger_number()
    }

    pub fn board_serial_number(&self) -> OverlayResult<u16> {
        Ok(self.metadata()?.board_serial_number())
    }

    pub fn num_adc_bits(&self) -> OverlayResult<u8> {
        Ok(self.metadata()?.num_adc_bits())
    }

    /// Number of ADC samples beyond the header, padding sample included
    pub fn total_adc_values(&self) -> OverlayResult<usize> {
        self.payload_element_count()
    }

    /// Sample at `index`
    pub fn adc_value(&self, index: usize) -> OverlayResult<u16> {
        Ok(self.element(index)?.get())
    }

    /// Sample at `index`, or [`ADC_SENTINEL`] if it cannot be read
    pub fn adc_value_or_sentinel(&self, index: usize) -> u16 {
        self.adc_value(index).unwrap_or(ADC_SENTINEL)
    }

    /// Samples as stored
    pub fn adc_values(&self) -> OverlayResult<&'a [AdcSample]> {
        self.payload()
    }

    /// Index of the first sample with bits set above `adc_bits`
    pub fn find_bad_adc(&self, adc_bits: u32) -> OverlayResult<Option<usize>> {
        let samples = self.adc_values()?;
        trace!(samples = samples.len(), adc_bits, "scanning ADC samples");
        Ok(samples
            .iter()
            .position(|sample| exceeds_width(sample.get(), adc_bits)))
    }

    /// Whether every sample fits in `adc_bits`
    pub fn fast_verify(&self, adc_bits: u32) -> bool {
        matches!(self.find_bad_adc(adc_bits), Ok(None))
    }

    /// Fail with the first sample that does not fit in `adc_bits`
    pub fn check_adc_data(&self, adc_bits: u32) -> OverlayResult<()> {
        match self.find_bad_adc(adc_bits)? {
            None => Ok(()),
            Some(index) => {
                let value = self.adc_value(index)?;
                Err(OverlayError::malformed_payload(
                    "adc_value",
                    ToyLayout::HEADER_BYTES + index * ToyLayout::ELEMENT_BYTES,
                    u64::from(value),
                    format!("less than {} ({} ADC bits)", adc_range(adc_bits), adc_bits),
                ))
            }
        }
    }

    /// Number of distinct values an `adc_bits`-wide sample can take
    pub fn adc_range(&self, adc_bits: u32) -> u64 {
        adc_range(adc_bits)
    }
}

fn adc_range(adc_bits: u32) -> u64 {
    1u64.checked_shl(adc_bits).unwrap_or(u64::MAX)
}

impl<B: FragmentBuffer> FragmentWriter<'_, ToyLayout, B> {
    pub fn set_trigger_number(&mut self, trigger_number: u32) -> OverlayResult<()> {
        self.header_mut()?.set_trigger_number(trigger_number);
        Ok(())
    }

    /// Resize to `samples.len()` samples and copy them in
    pub fn write_adc_values(&mut self, samples: &[u16]) -> OverlayResult<()> {
        self.fill_payload(samples.len(), samples.iter().map(|&value| AdcSample::new(value)))
    }
}

impl<B: FragmentBuffer> fmt::Display for FragmentReader<'_, ToyLayout, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ToyFragment event_size: {}, trigger_number: {}",
            self.event_size(),
            self.trigger_number()
        )?;
        if let Ok(count) = self.total_adc_values() {
            write!(f, ", adc_values: {}", count)?;
        }
        Ok(())
    }
}
