//! Backing buffer interface
//!
//! Overlays never own memory. They borrow a buffer that exposes a growable
//! payload region and, optionally, a separate metadata block:
//!
//! ```text
//! ┌──────────────────┬────────────────────────────────────┐
//! │ metadata block   │ payload region                     │
//! │ (fixed, optional)│ (resizable, ALLOCATION_UNIT steps) │
//! └──────────────────┴────────────────────────────────────┘
//! ```
//!
//! [`Fragment`] is an in-memory implementation with a 64-bit allocation unit,
//! used by producers that build records in process and by the test suites.

use zerocopy::AsBytes;

use crate::units::round_up_to_allocation_unit;

/// Storage an overlay can view and (for writers) grow
pub trait FragmentBuffer {
    /// Granularity of the payload region's size in bytes
    const ALLOCATION_UNIT: usize;

    /// Whether a metadata block is attached
    fn has_metadata(&self) -> bool;

    /// Raw metadata block, if attached
    fn metadata_bytes(&self) -> Option<&[u8]>;

    /// Current payload region
    fn payload_bytes(&self) -> &[u8];

    /// Current payload region, writable
    fn payload_bytes_mut(&mut self) -> &mut [u8];

    /// Resize the payload region to hold at least `n` bytes
    ///
    /// Existing prefix bytes are preserved. Implementations may round the
    /// size up to a multiple of [`Self::ALLOCATION_UNIT`].
    fn resize_bytes(&mut self, n: usize);

    /// Current payload size in bytes
    fn payload_byte_size(&self) -> usize {
        self.payload_bytes().len()
    }

    /// Round `n` up to this buffer's allocation unit
    fn round_up(n: usize) -> usize {
        round_up_to_allocation_unit(n, Self::ALLOCATION_UNIT)
    }
}

/// In-memory fragment buffer
///
/// The payload region always holds a whole number of 64-bit words; growth is
/// zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    metadata: Option<Vec<u8>>,
    payload: Vec<u8>,
}

impl Fragment {
    /// Payload granularity in bytes
    pub const WORD_BYTES: usize = 8;

    /// Empty fragment with no metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty fragment carrying a metadata block
    pub fn with_metadata<M: AsBytes>(metadata: &M) -> Self {
        Self {
            metadata: Some(metadata.as_bytes().to_vec()),
            payload: Vec::new(),
        }
    }

    /// Fragment wrapping received payload bytes, padded to a whole word
    pub fn from_payload_bytes(bytes: &[u8]) -> Self {
        let mut fragment = Self::new();
        fragment.payload.extend_from_slice(bytes);
        fragment.payload.resize(Self::round_up(bytes.len()), 0);
        fragment
    }

    /// Attach or replace the metadata block
    pub fn set_metadata<M: AsBytes>(&mut self, metadata: &M) {
        self.metadata = Some(metadata.as_bytes().to_vec());
    }

    /// Payload size in 64-bit words
    pub fn payload_words(&self) -> usize {
        self.payload.len() / Self::WORD_BYTES
    }

    /// Consume the fragment, returning its payload bytes
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl FragmentBuffer for Fragment {
    const ALLOCATION_UNIT: usize = Fragment::WORD_BYTES;

    fn has_metadata(&self) -> bool {
        self.metadata.is_some()
    }

    fn metadata_bytes(&self) -> Option<&[u8]> {
        self.metadata.as_deref()
    }

    fn payload_bytes(&self) -> &[u8] {
        &self.payload
    }

    fn payload_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.payload
    }

    fn resize_bytes(&mut self, n: usize) {
        self.payload.resize(Self::round_up(n), 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ToyMetadata;

    #[test]
    fn test_resize_rounds_to_words() {
        let mut fragment = Fragment::new();
        fragment.resize_bytes(12);
        assert_eq!(fragment.payload_byte_size(), 16);
        assert_eq!(fragment.payload_words(), 2);
        fragment.resize_bytes(0);
        assert_eq!(fragment.payload_byte_size(), 0);
    }

    #[test]
    fn test_resize_preserves_prefix() {
        let mut fragment = Fragment::from_payload_bytes(&[1, 2, 3]);
        assert_eq!(fragment.payload_bytes(), &[1, 2, 3, 0, 0, 0, 0, 0]);
        fragment.resize_bytes(20);
        assert_eq!(&fragment.payload_bytes()[..3], &[1, 2, 3]);
        assert_eq!(fragment.payload_byte_size(), 24);
    }

    #[test]
    fn test_metadata_block() {
        let fragment = Fragment::with_metadata(&ToyMetadata::new(7, 14));
        assert!(fragment.has_metadata());
        assert_eq!(fragment.metadata_bytes().map(<[u8]>::len), Some(4));
        assert_eq!(fragment.payload_byte_size(), 0);
        assert!(!Fragment::new().has_metadata());
    }
}
