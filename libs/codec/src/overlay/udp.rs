//! Datagram record overlays

use std::fmt;

use fragment_types::{DataType, FragmentBuffer, UdpLayout};

use super::{FragmentReader, FragmentWriter};
use crate::error::OverlayResult;

/// Read-only datagram overlay
pub type UdpFragment<'a, B> = FragmentReader<'a, UdpLayout, B>;

/// Writable datagram overlay
pub type UdpFragmentWriter<'a, B> = FragmentWriter<'a, UdpLayout, B>;

impl<'a, B: FragmentBuffer> FragmentReader<'a, UdpLayout, B> {
    /// Raw 4-bit data type tag
    pub fn data_type(&self) -> u8 {
        self.header().data_type()
    }

    /// Data type tag decoded; unknown tags are reported as a layout error
    pub fn data_type_kind(&self) -> OverlayResult<DataType> {
        Ok(DataType::from_raw(self.data_type())?)
    }

    /// Payload size in 32-bit words
    pub fn udp_data_words(&self) -> OverlayResult<usize> {
        self.payload_words()
    }

    /// The datagram bytes, including word padding
    pub fn datagram(&self) -> OverlayResult<&'a [u8]> {
        self.payload()
    }

    /// Source port recorded in the metadata block
    pub fn port(&self) -> OverlayResult<u16> {
        Ok(self.metadata()?.port())
    }

    /// Source IPv4 address recorded in the metadata block
    pub fn address(&self) -> OverlayResult<u32> {
        Ok(self.metadata()?.address())
    }
}

impl<B: FragmentBuffer> FragmentWriter<'_, UdpLayout, B> {
    pub fn set_data_type(&mut self, data_type: DataType) -> OverlayResult<()> {
        self.header_mut()?.set_data_type(data_type as u8);
        Ok(())
    }

    /// Resize to hold `datagram` and copy it in; trailing word padding is zeroed
    pub fn write_datagram(&mut self, datagram: &[u8]) -> OverlayResult<()> {
        self.write_elements(datagram)
    }
}

impl<B: FragmentBuffer> fmt::Display for FragmentReader<'_, UdpLayout, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UDPFragment_event_size: {}, data_type: {}",
            self.event_size(),
            self.data_type()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fragment_types::{Fragment, UdpMetadata};

    fn datagram_fragment(bytes: &[u8], data_type: DataType) -> Fragment {
        let mut fragment = Fragment::with_metadata(&UdpMetadata::new(5000, 0xC0A8_0001));
        {
            let mut writer = UdpFragmentWriter::new(&mut fragment).unwrap();
            writer.set_data_type(data_type).unwrap();
            writer.write_datagram(bytes).unwrap();
        }
        fragment
    }

    #[test]
    fn test_datagram_padded_to_whole_words() {
        let fragment = datagram_fragment(b"{\"a\":1}", DataType::Json);
        let reader = UdpFragment::new(&fragment).unwrap();

        // 7 bytes occupy two 32-bit words after the one-word header
        assert_eq!(reader.event_size(), 3);
        assert_eq!(reader.udp_data_words().unwrap(), 2);
        assert_eq!(reader.payload_element_count().unwrap(), 8);
        assert_eq!(&reader.datagram().unwrap()[..7], b"{\"a\":1}");
        assert_eq!(reader.datagram().unwrap()[7], 0);
        assert_eq!(reader.data_type_kind().unwrap(), DataType::Json);
    }

    #[test]
    fn test_metadata_and_display() {
        let fragment = datagram_fragment(b"ping", DataType::String);
        let reader = UdpFragment::new(&fragment).unwrap();

        assert_eq!(reader.port().unwrap(), 5000);
        assert_eq!(reader.address().unwrap(), 0xC0A8_0001);
        assert_eq!(reader.to_string(), "UDPFragment_event_size: 2, data_type: 2");
    }

    #[test]
    fn test_data_type_survives_resize() {
        let mut fragment = Fragment::with_metadata(&UdpMetadata::new(1, 1));
        let mut writer = UdpFragmentWriter::new(&mut fragment).unwrap();
        writer.set_data_type(DataType::Json).unwrap();
        writer.resize(100).unwrap();

        let reader = writer.reader().unwrap();
        assert_eq!(reader.data_type(), 1);
        assert_eq!(reader.udp_data_words().unwrap(), 25);
    }
}
