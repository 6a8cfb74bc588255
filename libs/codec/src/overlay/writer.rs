//! Mutable overlay that populates a word-packed record
//!
//! The writer holds the only mutable borrow of the buffer. It grows the
//! payload region, rewrites the header's size field, and hands out a
//! [`FragmentReader`] for read access instead of duplicating the read API.
//!
//! `resize` is the single code path that writes the event size. Payload slices
//! borrow the writer, so none can outlive a later `resize`.

use std::marker::PhantomData;

use fragment_types::{FragmentBuffer, RecordLayout};
use tracing::debug;
use zerocopy::{FromBytes, FromZeroes};

use super::reader::FragmentReader;
use crate::error::{OverlayError, OverlayResult};
use crate::validation::bounds;

/// Writable view of a word-packed record
pub struct FragmentWriter<'a, L: RecordLayout, B: FragmentBuffer> {
    buffer: &'a mut B,
    _layout: PhantomData<L>,
}

impl<'a, L: RecordLayout, B: FragmentBuffer> FragmentWriter<'a, L, B> {
    /// Overlay a writer on a freshly produced buffer
    ///
    /// The buffer must carry its metadata block and no payload bytes yet;
    /// anything else fails with [`OverlayError::MalformedBuffer`]. On success
    /// the payload region is grown to exactly one header with an empty payload.
    pub fn new(buffer: &'a mut B) -> OverlayResult<Self> {
        let has_metadata = buffer.has_metadata();
        let payload_bytes = buffer.payload_byte_size();
        if !has_metadata || payload_bytes > 0 {
            return Err(OverlayError::malformed_buffer(
                L::FORMAT.name(),
                has_metadata,
                payload_bytes,
            ));
        }

        let mut writer = Self {
            buffer,
            _layout: PhantomData,
        };
        writer.resize(0)?;
        debug!(format = %L::FORMAT, header_bytes = L::HEADER_BYTES, "fragment writer attached");
        Ok(writer)
    }

    /// Resize the record to hold `n_elements` payload elements
    ///
    /// Sets `event_size = elements_to_words(n_elements) + header_size_words`
    /// and grows the buffer to `event_size` words. Payload bytes exposed by
    /// growth read as zero. Fails without touching the buffer if the size does
    /// not fit the header's size field.
    pub fn resize(&mut self, n_elements: usize) -> OverlayResult<()> {
        let event_size = L::event_size_for(n_elements)?;

        let mut header = match self.buffer.payload_bytes().get(..L::HEADER_BYTES) {
            Some(bytes) => L::Header::read_from(bytes).ok_or_else(|| {
                OverlayError::buffer_too_small(L::HEADER_BYTES, bytes.len(), "header copy")
            })?,
            None => L::Header::new_zeroed(),
        };
        let old_bytes = L::event_size(&header).saturating_mul(L::WORD_BYTES);
        L::set_event_size(&mut header, event_size)?;

        let new_bytes = event_size * L::WORD_BYTES;
        self.buffer.resize_bytes(new_bytes);
        *self.header_mut()? = header;
        if let Some(grown) = self
            .buffer
            .payload_bytes_mut()
            .get_mut(old_bytes.max(L::HEADER_BYTES)..new_bytes)
        {
            grown.fill(0);
        }

        debug!(
            format = %L::FORMAT,
            elements = n_elements,
            event_size_words = event_size,
            buffer_bytes = self.buffer.payload_byte_size(),
            "fragment resized"
        );
        Ok(())
    }

    /// Read access to the record as it currently stands
    pub fn reader(&self) -> OverlayResult<FragmentReader<'_, L, B>> {
        FragmentReader::new(&*self.buffer)
    }

    /// Total record size in header-native words
    pub fn event_size(&self) -> OverlayResult<usize> {
        Ok(self.reader()?.event_size())
    }

    /// Number of payload elements the record currently holds
    pub fn payload_element_count(&self) -> OverlayResult<usize> {
        self.reader()?.payload_element_count()
    }

    /// Writable header
    pub(crate) fn header_mut(&mut self) -> OverlayResult<&mut L::Header> {
        let bytes = self.buffer.payload_bytes_mut();
        let len = bytes.len();
        let header_bytes = bounds::safe_slice_mut(bytes, 0, L::HEADER_BYTES, "writer header")?;
        L::Header::mut_from(header_bytes)
            .ok_or_else(|| OverlayError::buffer_too_small(L::HEADER_BYTES, len, "writer header"))
    }

    /// Writable payload elements, recomputed from the current header
    pub fn payload_mut(&mut self) -> OverlayResult<&mut [L::Element]> {
        let range = self.reader()?.payload_range()?;
        let offset = range.start;
        let bytes = &mut self.buffer.payload_bytes_mut()[range];
        let len = bytes.len();
        L::Element::mut_slice_from(bytes).ok_or_else(|| {
            OverlayError::malformed_payload(
                "payload_len",
                offset,
                len as u64,
                format!("a multiple of {} bytes", L::ELEMENT_BYTES),
            )
        })
    }

    /// Copy `elements` into the payload, resizing the record to fit them exactly
    ///
    /// Padding elements in the last word are zeroed, so nothing from an
    /// earlier, longer write survives.
    pub fn write_elements(&mut self, elements: &[L::Element]) -> OverlayResult<()> {
        self.fill_payload(elements.len(), elements.iter().copied())
    }

    /// Resize to `count` elements, take them from `elements`, zero the padding
    pub(crate) fn fill_payload<I>(&mut self, count: usize, elements: I) -> OverlayResult<()>
    where
        I: IntoIterator<Item = L::Element>,
    {
        self.resize(count)?;
        let payload = self.payload_mut()?;
        let (data, padding) = payload.split_at_mut(count);
        for (slot, element) in data.iter_mut().zip(elements) {
            *slot = element;
        }
        padding.fill(L::Element::new_zeroed());
        Ok(())
    }
}
