//! Read-only overlay over a word-packed record
//!
//! A reader borrows a buffer and interprets its payload region as
//! `{Header, Payload}` according to a [`RecordLayout`]. It stores nothing but
//! the borrow and a view of the header; every size is recomputed from the
//! header on each call.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

use fragment_types::{FragmentBuffer, RecordLayout};
use zerocopy::FromBytes;

use crate::error::{OverlayError, OverlayResult};
use crate::validation::bounds;

/// Read-only view of a word-packed record
pub struct FragmentReader<'a, L: RecordLayout, B: FragmentBuffer> {
    buffer: &'a B,
    header: &'a L::Header,
    _layout: PhantomData<L>,
}

impl<'a, L: RecordLayout, B: FragmentBuffer> FragmentReader<'a, L, B> {
    /// Overlay a reader on `buffer`
    ///
    /// Fails if the buffer cannot hold the header. Payload bounds are checked
    /// lazily by the payload accessors.
    pub fn new(buffer: &'a B) -> OverlayResult<Self> {
        let bytes = buffer.payload_bytes();
        let header_bytes = bounds::safe_slice(bytes, 0, L::HEADER_BYTES, L::FORMAT.name())?;
        let header = L::Header::ref_from(header_bytes).ok_or_else(|| {
            OverlayError::buffer_too_small(L::HEADER_BYTES, bytes.len(), "header view")
        })?;

        Ok(Self {
            buffer,
            header,
            _layout: PhantomData,
        })
    }

    /// Header size in header-native words
    pub const fn header_size_words() -> usize {
        L::HEADER_SIZE_WORDS
    }

    /// The record header
    pub fn header(&self) -> &'a L::Header {
        self.header
    }

    /// The underlying buffer
    pub fn buffer(&self) -> &'a B {
        self.buffer
    }

    /// Total record size in header-native words, as declared by the header
    pub fn event_size(&self) -> usize {
        L::event_size(self.header)
    }

    /// Payload size in header-native words
    pub fn payload_words(&self) -> OverlayResult<usize> {
        let event_size = self.event_size();
        event_size.checked_sub(L::HEADER_SIZE_WORDS).ok_or_else(|| {
            OverlayError::malformed_header(
                "event_size",
                event_size as u64,
                format!("at least {} words (header size)", L::HEADER_SIZE_WORDS),
            )
        })
    }

    /// Number of payload elements derived from the header's event size
    pub fn payload_element_count(&self) -> OverlayResult<usize> {
        Ok(L::words_to_elements(self.payload_words()?))
    }

    /// Byte offsets `payload_begin..payload_end` within the buffer's payload region
    pub fn payload_range(&self) -> OverlayResult<Range<usize>> {
        let count = self.payload_element_count()?;
        let len = count.checked_mul(L::ELEMENT_BYTES).ok_or_else(|| {
            OverlayError::malformed_header(
                "event_size",
                self.event_size() as u64,
                "a payload size representable in memory",
            )
        })?;
        let range = bounds::byte_range(L::HEADER_BYTES, len)
            .filter(|range| range.end <= self.buffer.payload_byte_size())
            .ok_or_else(|| {
                OverlayError::malformed_payload(
                    "payload_end",
                    L::HEADER_BYTES,
                    L::HEADER_BYTES.saturating_add(len) as u64,
                    format!("at most {} bytes (buffer size)", self.buffer.payload_byte_size()),
                )
            })?;
        Ok(range)
    }

    /// Payload elements
    pub fn payload(&self) -> OverlayResult<&'a [L::Element]> {
        let range = self.payload_range()?;
        let offset = range.start;
        let bytes = &self.buffer.payload_bytes()[range];
        L::Element::slice_from(bytes).ok_or_else(|| {
            OverlayError::malformed_payload(
                "payload_len",
                offset,
                bytes.len() as u64,
                format!("a multiple of {} bytes", L::ELEMENT_BYTES),
            )
        })
    }

    /// Payload element at `index`
    pub fn element(&self, index: usize) -> OverlayResult<L::Element> {
        let payload = self.payload()?;
        payload
            .get(index)
            .copied()
            .ok_or_else(|| OverlayError::index_out_of_range(index, payload.len()))
    }

    /// Metadata block stored alongside the record
    pub fn metadata(&self) -> OverlayResult<&'a L::Metadata> {
        let bytes = self.buffer.metadata_bytes().ok_or_else(|| {
            OverlayError::buffer_too_small(L::METADATA_BYTES, 0, "metadata block missing")
        })?;
        L::Metadata::ref_from_prefix(bytes).ok_or_else(|| {
            OverlayError::buffer_too_small(L::METADATA_BYTES, bytes.len(), "metadata block")
        })
    }
}

impl<L: RecordLayout, B: FragmentBuffer> Clone for FragmentReader<'_, L, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: RecordLayout, B: FragmentBuffer> Copy for FragmentReader<'_, L, B> {}

impl<L: RecordLayout, B: FragmentBuffer> fmt::Debug for FragmentReader<'_, L, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FragmentReader")
            .field("format", &L::FORMAT)
            .field("header", self.header)
            .field("buffer_bytes", &self.buffer.payload_byte_size())
            .finish()
    }
}
