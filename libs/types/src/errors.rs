//! Error types for record layout encoding
//!
//! Layout errors are raised when a value does not fit the bit-field it is
//! written into, or when a raw tag byte does not name a known format or data type.

use thiserror::Error;

/// Errors that can occur while encoding or decoding fixed record layouts
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Value does not fit into the bit-field reserved for it
    #[error("Field overflow: {field} = {value} does not fit in {bits} bits (max {max})")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        bits: u32,
        max: u64,
    },

    /// Raw format tag does not correspond to any known record format
    #[error("Unknown fragment format tag {0}")]
    UnknownFormat(u8),

    /// Raw datagram type tag is outside the defined range
    #[error("Unknown datagram data type {0}: expected 0 (raw), 1 (json) or 2 (string)")]
    UnknownDataType(u8),
}

impl LayoutError {
    /// Create a FieldOverflow error for a field of the given width
    pub fn field_overflow(field: &'static str, value: u64, bits: u32) -> Self {
        Self::FieldOverflow {
            field,
            value,
            bits,
            max: crate::layout::bits::field_max(bits),
        }
    }
}

/// Result type for layout operations
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
