//! Multi-hit detector record overlays
//!
//! Detector records are not word-packed: the header carries a hit count
//! instead of a size, and hits are addressed by byte offset. The reader
//! bounds-checks every hit against both the declared count and the buffer's
//! extent. Structural plausibility (markers, channel and ADC ranges,
//! timestamps) is the validator's job, not the reader's.

use std::fmt;

use fragment_types::detector::{self, DetectorHeader, DetectorHit};
use fragment_types::{FragmentBuffer, LayoutError};
use tracing::debug;
use zerocopy::FromBytes;

use crate::error::{OverlayError, OverlayResult};
use crate::validation::bounds;

const FORMAT_NAME: &str = "detector";

/// Read-only view of a detector record
pub struct DetectorFragment<'a, B: FragmentBuffer> {
    buffer: &'a B,
    header: &'a DetectorHeader,
}

impl<'a, B: FragmentBuffer> DetectorFragment<'a, B> {
    /// Overlay a reader on `buffer`; fails if the header does not fit
    pub fn new(buffer: &'a B) -> OverlayResult<Self> {
        let bytes = buffer.payload_bytes();
        let header_bytes = bounds::safe_slice(bytes, 0, detector::HEADER_BYTES, FORMAT_NAME)?;
        let header = DetectorHeader::ref_from(header_bytes).ok_or_else(|| {
            OverlayError::buffer_too_small(detector::HEADER_BYTES, bytes.len(), "detector header")
        })?;
        Ok(Self { buffer, header })
    }

    pub fn header(&self) -> &'a DetectorHeader {
        self.header
    }

    pub fn module_num(&self) -> u16 {
        self.header.module_num()
    }

    /// Hit count declared by the header
    pub fn num_hits(&self) -> usize {
        usize::from(self.header.nhit())
    }

    pub fn unixtime(&self) -> i32 {
        self.header.unixtime()
    }

    pub fn fifty_mhz_time(&self) -> u32 {
        self.header.fifty_mhz_time()
    }

    /// Hit `index`, checked against the declared count and the buffer extent
    pub fn hit(&self, index: usize) -> OverlayResult<&'a DetectorHit> {
        let count = self.num_hits();
        if index >= count {
            return Err(OverlayError::index_out_of_range(index, count));
        }
        hit_at(self.buffer.payload_bytes(), index)
    }

    pub fn channel(&self, index: usize) -> OverlayResult<u8> {
        Ok(self.hit(index)?.channel())
    }

    pub fn adc(&self, index: usize) -> OverlayResult<u16> {
        Ok(self.hit(index)?.adc())
    }

    /// All declared hits; fails if the buffer is shorter than the count implies
    pub fn hits(&self) -> OverlayResult<&'a [DetectorHit]> {
        let count = self.num_hits();
        let need = detector::record_bytes(count);
        let bytes = self.buffer.payload_bytes();
        if bytes.len() < need {
            return Err(OverlayError::malformed_payload(
                "nhit",
                detector::HEADER_BYTES,
                count as u64,
                format!(
                    "at most {} hits ({} bytes in buffer)",
                    bytes.len().saturating_sub(detector::HEADER_BYTES) / detector::HIT_BYTES,
                    bytes.len()
                ),
            ));
        }
        DetectorHit::slice_from(&bytes[detector::HEADER_BYTES..need]).ok_or_else(|| {
            OverlayError::buffer_too_small(need, bytes.len(), "detector hits")
        })
    }

    /// Byte extent of the backing payload region
    pub fn buffer_bytes(&self) -> usize {
        self.buffer.payload_byte_size()
    }
}

/// Hit view at `index` without consulting the hit count
pub(crate) fn hit_at(bytes: &[u8], index: usize) -> OverlayResult<&DetectorHit> {
    let offset = index
        .checked_mul(detector::HIT_BYTES)
        .and_then(|offset| offset.checked_add(detector::HEADER_BYTES))
        .ok_or_else(|| OverlayError::buffer_too_small(usize::MAX, bytes.len(), "hit offset"))?;
    let hit_bytes = bounds::safe_slice(bytes, offset, detector::HIT_BYTES, "detector hit")?;
    DetectorHit::ref_from(hit_bytes)
        .ok_or_else(|| OverlayError::buffer_too_small(detector::HIT_BYTES, hit_bytes.len(), "detector hit"))
}

impl<B: FragmentBuffer> Clone for DetectorFragment<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: FragmentBuffer> Copy for DetectorFragment<'_, B> {}

impl<B: FragmentBuffer> fmt::Debug for DetectorFragment<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorFragment")
            .field("header", self.header)
            .field("buffer_bytes", &self.buffer_bytes())
            .finish()
    }
}

impl<B: FragmentBuffer> fmt::Display for DetectorFragment<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DetectorFragment module: {}, nhit: {}, unixtime: {}, fifty_mhz_time: {}",
            self.module_num(),
            self.num_hits(),
            self.unixtime(),
            self.fifty_mhz_time()
        )
    }
}

/// Writable view that builds a detector record
#[derive(Debug)]
pub struct DetectorFragmentWriter<'a, B: FragmentBuffer> {
    buffer: &'a mut B,
}

impl<'a, B: FragmentBuffer> DetectorFragmentWriter<'a, B> {
    /// Overlay a writer on a buffer with an empty payload
    ///
    /// Detector records carry no metadata block, so only the payload is
    /// checked. The record starts as a header with zero hits.
    pub fn new(buffer: &'a mut B) -> OverlayResult<Self> {
        let payload_bytes = buffer.payload_byte_size();
        if payload_bytes > 0 {
            return Err(OverlayError::MalformedBuffer {
                format: FORMAT_NAME,
                reason: "buffer already holds payload data".to_string(),
                has_metadata: buffer.has_metadata(),
                payload_bytes,
            });
        }

        let mut writer = Self { buffer };
        writer.resize(0)?;
        debug!(header_bytes = detector::HEADER_BYTES, "detector writer attached");
        Ok(writer)
    }

    /// Resize to `n_hits` hits, writing the header marker and hit count
    ///
    /// Hits already written keep their contents; new hits are zeroed.
    pub fn resize(&mut self, n_hits: usize) -> OverlayResult<()> {
        let nhit = u8::try_from(n_hits)
            .map_err(|_| LayoutError::field_overflow("nhit", n_hits as u64, u8::BITS))?;

        self.buffer.resize_bytes(detector::record_bytes(n_hits));
        let header = self.header_mut()?;
        header.set_magic(detector::HEADER_MAGIC);
        header.set_nhit(nhit);

        debug!(
            hits = n_hits,
            buffer_bytes = self.buffer.payload_byte_size(),
            "detector record resized"
        );
        Ok(())
    }

    /// Read access to the record as it currently stands
    pub fn reader(&self) -> OverlayResult<DetectorFragment<'_, B>> {
        DetectorFragment::new(&*self.buffer)
    }

    fn header_mut(&mut self) -> OverlayResult<&mut DetectorHeader> {
        let bytes = self.buffer.payload_bytes_mut();
        let len = bytes.len();
        let header_bytes =
            bounds::safe_slice_mut(bytes, 0, detector::HEADER_BYTES, "detector writer header")?;
        DetectorHeader::mut_from(header_bytes).ok_or_else(|| {
            OverlayError::buffer_too_small(detector::HEADER_BYTES, len, "detector writer header")
        })
    }

    pub fn set_module_num(&mut self, module_num: u16) -> OverlayResult<()> {
        self.header_mut()?.set_module_num(module_num);
        Ok(())
    }

    pub fn set_unixtime(&mut self, unixtime: i32) -> OverlayResult<()> {
        self.header_mut()?.set_unixtime(unixtime);
        Ok(())
    }

    pub fn set_fifty_mhz_time(&mut self, fifty_mhz_time: u32) -> OverlayResult<()> {
        self.header_mut()?.set_fifty_mhz_time(fifty_mhz_time);
        Ok(())
    }

    /// Write hit `index` with the hit marker
    pub fn set_hit(&mut self, index: usize, channel: u8, adc: u16) -> OverlayResult<()> {
        let count = self.reader()?.num_hits();
        if index >= count {
            return Err(OverlayError::index_out_of_range(index, count));
        }

        let offset = detector::record_bytes(index);
        let bytes = self.buffer.payload_bytes_mut();
        let hit_bytes = bounds::safe_slice_mut(bytes, offset, detector::HIT_BYTES, "detector hit")?;
        let hit = DetectorHit::mut_from(hit_bytes).ok_or_else(|| {
            OverlayError::buffer_too_small(detector::HIT_BYTES, 0, "detector hit")
        })?;
        *hit = DetectorHit::new(channel, adc);
        Ok(())
    }

    /// Resize to `hits.len()` and write every hit
    pub fn write_hits(&mut self, hits: &[(u8, u16)]) -> OverlayResult<()> {
        self.resize(hits.len())?;
        for (index, &(channel, adc)) in hits.iter().enumerate() {
            self.set_hit(index, channel, adc)?;
        }
        Ok(())
    }
}
