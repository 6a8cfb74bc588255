//! Network datagram record layout
//!
//! Carries the payload of one received datagram. The header is a single
//! 32-bit word; the 28-bit event size limits a record to 2^28 words (1 GiB).
//!
//! ```text
//! byte 0..4   u32 LE   bits 0..28 event_size, bits 28..32 data type
//! byte 4..    u8       datagram bytes, padded to a whole word
//!
//! metadata (8 bytes)
//! byte 0..8   u64 LE   bits 0..16 port, bits 16..48 address, bits 48..64 unused
//! ```

use num_enum::TryFromPrimitive;
use std::fmt;
use zerocopy::byteorder::{LittleEndian, U32, U64};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

use super::bits;
use super::{assert_header_size, RecordLayout, EVENT_SIZE_BITS};
use crate::errors::{LayoutError, LayoutResult};
use crate::format::FragmentFormat;

const DATA_TYPE_SHIFT: u32 = 28;
const DATA_TYPE_BITS: u32 = 4;

const PORT_SHIFT: u32 = 0;
const PORT_BITS: u32 = 16;
const ADDRESS_SHIFT: u32 = 16;
const ADDRESS_BITS: u32 = 32;

/// Interpretation of the datagram bytes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataType {
    Raw = 0,
    Json = 1,
    String = 2,
}

impl DataType {
    pub fn from_raw(raw: u8) -> LayoutResult<Self> {
        Self::try_from(raw).map_err(|_| LayoutError::UnknownDataType(raw))
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Raw => "raw",
            DataType::Json => "json",
            DataType::String => "string",
        };
        f.write_str(name)
    }
}

/// Datagram header (4 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeroes, FromBytes, AsBytes, Unaligned)]
pub struct UdpHeader {
    word: U32<LittleEndian>,
}

impl UdpHeader {
    /// Event size in 32-bit words, header included
    pub fn event_size(&self) -> u32 {
        bits::extract(u64::from(self.word.get()), 0, EVENT_SIZE_BITS) as u32
    }

    pub fn set_event_size(&mut self, words: usize) -> LayoutResult<()> {
        let word = bits::insert(
            u64::from(self.word.get()),
            0,
            EVENT_SIZE_BITS,
            words as u64,
            "event_size",
        )?;
        self.word.set(word as u32);
        Ok(())
    }

    /// Raw 4-bit data type tag
    pub fn data_type(&self) -> u8 {
        bits::extract(u64::from(self.word.get()), DATA_TYPE_SHIFT, DATA_TYPE_BITS) as u8
    }

    /// Store a data type tag, keeping only its low four bits
    pub fn set_data_type(&mut self, data_type: u8) {
        let word = bits::insert_masked(
            u64::from(self.word.get()),
            DATA_TYPE_SHIFT,
            DATA_TYPE_BITS,
            u64::from(data_type),
        );
        self.word.set(word as u32);
    }
}

/// Datagram metadata (8 bytes): where the datagram was received
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeroes, FromBytes, AsBytes, Unaligned)]
pub struct UdpMetadata {
    word: U64<LittleEndian>,
}

impl UdpMetadata {
    pub fn new(port: u16, address: u32) -> Self {
        let word = bits::insert_masked(0, PORT_SHIFT, PORT_BITS, u64::from(port));
        let word = bits::insert_masked(word, ADDRESS_SHIFT, ADDRESS_BITS, u64::from(address));
        Self { word: U64::new(word) }
    }

    /// Port the datagram arrived on
    pub fn port(&self) -> u16 {
        bits::extract(self.word.get(), PORT_SHIFT, PORT_BITS) as u16
    }

    /// IPv4 address as stored by the receiver
    pub fn address(&self) -> u32 {
        bits::extract(self.word.get(), ADDRESS_SHIFT, ADDRESS_BITS) as u32
    }
}

/// Datagram record format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UdpLayout;

impl RecordLayout for UdpLayout {
    type Header = UdpHeader;
    type Metadata = UdpMetadata;
    type Element = u8;

    const FORMAT: FragmentFormat = FragmentFormat::UdpV1;
    const WORD_BYTES: usize = 4;
    const HEADER_SIZE_WORDS: usize = 1;

    fn event_size(header: &UdpHeader) -> usize {
        header.event_size() as usize
    }

    fn set_event_size(header: &mut UdpHeader, words: usize) -> LayoutResult<()> {
        header.set_event_size(words)
    }
}

assert_header_size!(UdpLayout, UdpHeader);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_does_not_clobber_size() {
        let mut header = UdpHeader::new_zeroed();
        header.set_event_size(0x0ABC_DEF0).unwrap();
        header.set_data_type(DataType::String as u8);
        assert_eq!(header.event_size(), 0x0ABC_DEF0);
        assert_eq!(header.data_type(), 2);
        assert_eq!(header.as_bytes(), &[0xF0, 0xDE, 0xBC, 0x2A]);
    }

    #[test]
    fn test_data_type_is_masked_to_four_bits() {
        let mut header = UdpHeader::new_zeroed();
        header.set_data_type(0x13);
        assert_eq!(header.data_type(), 0x3);
        assert_eq!(header.event_size(), 0);
    }

    #[test]
    fn test_unknown_data_type() {
        assert_eq!(DataType::from_raw(1).unwrap(), DataType::Json);
        assert_eq!(DataType::from_raw(7), Err(LayoutError::UnknownDataType(7)));
    }

    #[test]
    fn test_metadata_fields() {
        let metadata = UdpMetadata::new(5140, 0xC0A8_0001);
        assert_eq!(metadata.port(), 5140);
        assert_eq!(metadata.address(), 0xC0A8_0001);
        assert_eq!(
            metadata.as_bytes(),
            &[0x14, 0x14, 0x01, 0x00, 0xA8, 0xC0, 0x00, 0x00]
        );
    }
}
