//! Simulated ADC record layout
//!
//! Interprets data from a hypothetical 16-bit ADC board whose samples carry
//! 12 or 14 meaningful bits. The header word is 32 bits, so each word holds
//! two samples and an odd sample count is padded to a whole word.
//!
//! ```text
//! byte 0..4   u32 LE   bits 0..28 event_size, bits 28..32 unused
//! byte 4..8   u32 LE   trigger_number
//! byte 8..    u16 LE   ADC samples
//!
//! metadata (4 bytes)
//! byte 0..4   u32 LE   bits 0..16 board serial, bits 16..24 ADC bits, bits 24..32 unused
//! ```

use zerocopy::byteorder::{LittleEndian, U16, U32};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use super::bits;
use super::{assert_header_size, RecordLayout, EVENT_SIZE_BITS};
use crate::errors::LayoutResult;
use crate::format::FragmentFormat;

const SERIAL_SHIFT: u32 = 0;
const SERIAL_BITS: u32 = 16;
const ADC_BITS_SHIFT: u32 = 16;
const ADC_BITS_BITS: u32 = 8;

/// One ADC sample as stored in the payload
pub type AdcSample = U16<LittleEndian>;

/// ADC header (8 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeroes, FromBytes, AsBytes, Unaligned)]
pub struct ToyHeader {
    size_word: U32<LittleEndian>,
    trigger_number: U32<LittleEndian>,
}

impl ToyHeader {
    /// Event size in 32-bit words, header included
    pub fn event_size(&self) -> u32 {
        bits::extract(u64::from(self.size_word.get()), 0, EVENT_SIZE_BITS) as u32
    }

    pub fn set_event_size(&mut self, words: usize) -> LayoutResult<()> {
        let word = bits::insert(
            u64::from(self.size_word.get()),
            0,
            EVENT_SIZE_BITS,
            words as u64,
            "event_size",
        )?;
        self.size_word.set(word as u32);
        Ok(())
    }

    pub fn trigger_number(&self) -> u32 {
        self.trigger_number.get()
    }

    pub fn set_trigger_number(&mut self, trigger_number: u32) {
        self.trigger_number.set(trigger_number);
    }
}

/// Board configuration that is not part of the per-event readout
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeroes, FromBytes, AsBytes, Unaligned)]
pub struct ToyMetadata {
    word: U32<LittleEndian>,
}

impl ToyMetadata {
    pub fn new(board_serial_number: u16, num_adc_bits: u8) -> Self {
        let word = bits::insert_masked(0, SERIAL_SHIFT, SERIAL_BITS, u64::from(board_serial_number));
        let word = bits::insert_masked(word, ADC_BITS_SHIFT, ADC_BITS_BITS, u64::from(num_adc_bits));
        Self {
            word: U32::new(word as u32),
        }
    }

    pub fn board_serial_number(&self) -> u16 {
        bits::extract(u64::from(self.word.get()), SERIAL_SHIFT, SERIAL_BITS) as u16
    }

    /// Number of meaningful bits per sample
    pub fn num_adc_bits(&self) -> u8 {
        bits::extract(u64::from(self.word.get()), ADC_BITS_SHIFT, ADC_BITS_BITS) as u8
    }
}

/// Simulated ADC record format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToyLayout;

impl RecordLayout for ToyLayout {
    type Header = ToyHeader;
    type Metadata = ToyMetadata;
    type Element = AdcSample;

    const FORMAT: FragmentFormat = FragmentFormat::ToyV1;
    const WORD_BYTES: usize = 4;
    const HEADER_SIZE_WORDS: usize = 2;

    fn event_size(header: &ToyHeader) -> usize {
        header.event_size() as usize
    }

    fn set_event_size(header: &mut ToyHeader, words: usize) -> LayoutResult<()> {
        header.set_event_size(words)
    }
}

assert_header_size!(ToyLayout, ToyHeader);
