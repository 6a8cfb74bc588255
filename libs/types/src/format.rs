//! Record format identifiers
//!
//! Each concrete record definition gets its own tag. When a format's layout
//! changes incompatibly, the new definition is added as a new variant (and a
//! new layout type) instead of replacing the old one, so buffers written with
//! either definition stay readable by a caller that knows which one it holds.

use num_enum::TryFromPrimitive;
use std::fmt;

use crate::errors::LayoutError;

/// Record formats understood by the overlay layer
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FragmentFormat {
    /// Line-oriented text record, 16-byte header, 1-byte characters
    AsciiV1 = 1,
    /// Network datagram record, 4-byte header, raw bytes
    UdpV1 = 2,
    /// Simulated 16-bit ADC record, 8-byte header
    ToyV1 = 3,
    /// Multi-hit detector module record, 12-byte header, 4-byte hits
    DetectorV1 = 4,
}

impl FragmentFormat {
    /// Parse a raw format tag
    pub fn from_tag(tag: u8) -> Result<Self, LayoutError> {
        Self::try_from(tag).map_err(|_| LayoutError::UnknownFormat(tag))
    }

    /// Raw tag value
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Short human-readable name
    pub fn name(self) -> &'static str {
        match self {
            FragmentFormat::AsciiV1 => "ascii",
            FragmentFormat::UdpV1 => "udp",
            FragmentFormat::ToyV1 => "toy",
            FragmentFormat::DetectorV1 => "detector",
        }
    }

    /// Layout revision of this format definition
    pub fn version(self) -> u8 {
        1
    }

    /// Whether the format defines a metadata block
    pub fn has_metadata(self) -> bool {
        !matches!(self, FragmentFormat::DetectorV1)
    }
}

impl fmt::Display for FragmentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/v{}", self.name(), self.version())
    }
}
