//! Line-text record layout
//!
//! Holds one line of text. The header-native word of this format is a single
//! character, so the event size counts bytes and a payload of `n` characters
//! needs exactly `n` words.
//!
//! ```text
//! byte  0..8   u64 LE   bits 0..28 event_size, bits 28..64 unused
//! byte  8..16  u64 LE   line_number
//! byte 16..    u8       characters
//! ```

use zerocopy::byteorder::{LittleEndian, U32, U64};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use super::bits;
use super::{assert_header_size, RecordLayout, EVENT_SIZE_BITS};
use crate::errors::LayoutResult;
use crate::format::FragmentFormat;

/// Line-text header (16 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeroes, FromBytes, AsBytes, Unaligned)]
pub struct AsciiHeader {
    size_word: U64<LittleEndian>,
    line_number: U64<LittleEndian>,
}

impl AsciiHeader {
    /// Event size in characters, header included
    pub fn event_size(&self) -> u32 {
        bits::extract(self.size_word.get(), 0, EVENT_SIZE_BITS) as u32
    }

    pub fn set_event_size(&mut self, words: usize) -> LayoutResult<()> {
        let word = bits::insert(
            self.size_word.get(),
            0,
            EVENT_SIZE_BITS,
            words as u64,
            "event_size",
        )?;
        self.size_word.set(word);
        Ok(())
    }

    /// Line number of the contained text
    pub fn line_number(&self) -> u64 {
        self.line_number.get()
    }

    pub fn set_line_number(&mut self, line_number: u64) {
        self.line_number.set(line_number);
    }
}

/// Line-text metadata (4 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeroes, FromBytes, AsBytes, Unaligned)]
pub struct AsciiMetadata {
    chars_in_line: U32<LittleEndian>,
}

impl AsciiMetadata {
    pub fn new(chars_in_line: u32) -> Self {
        Self {
            chars_in_line: U32::new(chars_in_line),
        }
    }

    /// How many characters the producer put in the line
    pub fn chars_in_line(&self) -> u32 {
        self.chars_in_line.get()
    }
}

/// Line-text record format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsciiLayout;

impl RecordLayout for AsciiLayout {
    type Header = AsciiHeader;
    type Metadata = AsciiMetadata;
    type Element = u8;

    const FORMAT: FragmentFormat = FragmentFormat::AsciiV1;
    const WORD_BYTES: usize = 1;
    const HEADER_SIZE_WORDS: usize = 16;

    fn event_size(header: &AsciiHeader) -> usize {
        header.event_size() as usize
    }

    fn set_event_size(header: &mut AsciiHeader, words: usize) -> LayoutResult<()> {
        header.set_event_size(words)
    }
}

assert_header_size!(AsciiLayout, AsciiHeader);
