//! Fixed record layouts
//!
//! A word-packed record is a fixed-size header whose first field is a 28-bit
//! *event size* (total record size in header-native words, header included),
//! followed by a payload of fixed-size elements whose count is derived from
//! that field:
//!
//! ```text
//! ┌──────────────────────┬────────────────────────────────────────┐
//! │ Header               │ Payload                                │
//! │ HEADER_SIZE_WORDS    │ (event_size - HEADER_SIZE_WORDS) words │
//! │ × WORD_BYTES         │ × ELEMENTS_PER_WORD elements           │
//! └──────────────────────┴────────────────────────────────────────┘
//! ```
//!
//! Metadata, where a format defines it, lives outside this region in the
//! backing buffer's own metadata block.
//!
//! All multi-byte fields are little-endian. Packed fields are LSB-first in
//! declaration order (see [`bits`]). Every struct here is `Unaligned`, so it can
//! be viewed in place at any offset of a byte buffer.
//!
//! The detector format is not word-packed (its size comes from a hit count)
//! and does not implement [`RecordLayout`].

/// Fail compilation if a header's size disagrees with its declared word count
macro_rules! assert_header_size {
    ($layout:ty, $header:ty) => {
        const _: () = assert!(
            ::std::mem::size_of::<$header>()
                == <$layout as $crate::layout::RecordLayout>::HEADER_SIZE_WORDS
                    * <$layout as $crate::layout::RecordLayout>::WORD_BYTES,
            concat!(stringify!($header), " size changed")
        );
    };
}

pub(crate) use assert_header_size;

pub mod ascii;
pub mod bits;
pub mod detector;
pub mod toy;
pub mod udp;

use std::fmt::Debug;
use std::mem::size_of;

use zerocopy::{AsBytes, FromBytes, Unaligned};

use crate::errors::{LayoutError, LayoutResult};
use crate::format::FragmentFormat;
use crate::units;

/// Width of the event-size field shared by all word-packed headers
pub const EVENT_SIZE_BITS: u32 = 28;

/// Largest event size (in words) a word-packed header can declare
pub const EVENT_SIZE_MAX: u64 = bits::field_max(EVENT_SIZE_BITS);

/// Compile-time description of a word-packed record format
pub trait RecordLayout {
    /// Fixed header at the start of the payload region
    type Header: FromBytes + AsBytes + Unaligned + Copy + Debug;
    /// Fixed metadata block stored by the buffer
    type Metadata: FromBytes + AsBytes + Unaligned + Copy + Debug;
    /// One payload element
    type Element: FromBytes + AsBytes + Unaligned + Copy + Debug;

    /// Format identifier
    const FORMAT: FragmentFormat;
    /// Size of one header-native word in bytes
    const WORD_BYTES: usize;
    /// Header size in header-native words
    const HEADER_SIZE_WORDS: usize;

    /// Header size in bytes
    const HEADER_BYTES: usize = Self::HEADER_SIZE_WORDS * Self::WORD_BYTES;
    /// Size of one payload element in bytes
    const ELEMENT_BYTES: usize = size_of::<Self::Element>();
    /// Payload elements per header-native word
    const ELEMENTS_PER_WORD: usize = Self::WORD_BYTES / Self::ELEMENT_BYTES;
    /// Metadata size in bytes
    const METADATA_BYTES: usize = size_of::<Self::Metadata>();

    /// Read the event size (in words) from a header
    fn event_size(header: &Self::Header) -> usize;

    /// Write the event size (in words) into a header
    fn set_event_size(header: &mut Self::Header, words: usize) -> LayoutResult<()>;

    /// Words needed for `n_elements` payload elements
    fn elements_to_words(n_elements: usize) -> usize {
        units::elements_to_words(n_elements, Self::ELEMENTS_PER_WORD)
    }

    /// Elements that fit in `n_words` payload words
    fn words_to_elements(n_words: usize) -> usize {
        units::words_to_elements(n_words, Self::ELEMENTS_PER_WORD)
    }

    /// Event size (header included) for a payload of `n_elements`
    ///
    /// Fails if the sum is not representable; the header's size field applies
    /// its own narrower limit when the size is written.
    fn event_size_for(n_elements: usize) -> LayoutResult<usize> {
        Self::elements_to_words(n_elements)
            .checked_add(Self::HEADER_SIZE_WORDS)
            .ok_or_else(|| {
                LayoutError::field_overflow("event_size", n_elements as u64, EVENT_SIZE_BITS)
            })
    }
}

pub use ascii::{AsciiHeader, AsciiLayout, AsciiMetadata};
pub use detector::{DetectorHeader, DetectorHit};
pub use toy::{ToyHeader, ToyLayout, ToyMetadata};
pub use udp::{DataType, UdpHeader, UdpLayout, UdpMetadata};
