//! Overlay errors for fragment record access
//!
//! Every failure names the field or region involved together with the
//! observed and expected values, so an operator chasing hardware or network
//! corruption can tell from the message alone what went wrong.

use fragment_types::LayoutError;
use thiserror::Error;

/// Errors raised by reader and writer overlays
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OverlayError {
    /// Writer constructed over a buffer that is not metadata-only with an empty payload
    #[error("Malformed buffer for {format} writer: {reason} (has_metadata: {has_metadata}, payload: {payload_bytes} bytes)")]
    MalformedBuffer {
        format: &'static str,
        reason: String,
        has_metadata: bool,
        payload_bytes: usize,
    },

    /// Buffer is too small to contain the expected structure
    #[error("Buffer too small: need {need} bytes, got {got} (context: {context})")]
    BufferTooSmall {
        need: usize,
        got: usize,
        context: String,
    },

    /// A header field holds a value the format does not allow
    #[error("Malformed header: {field} = {observed}, expected {expected}")]
    MalformedHeader {
        field: &'static str,
        observed: u64,
        expected: String,
    },

    /// Payload extent or an individual element fails its own sanity check
    #[error("Malformed payload at byte {offset}: {field} = {observed}, expected {expected}")]
    MalformedPayload {
        field: &'static str,
        offset: usize,
        observed: u64,
        expected: String,
    },

    /// Element or hit index beyond the computed count
    #[error("Index {index} out of range: payload holds {count} elements")]
    IndexOutOfRange { index: usize, count: usize },

    /// A value does not fit the header field it is written into
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

impl OverlayError {
    /// Create MalformedBuffer error for a rejected writer construction
    pub fn malformed_buffer(
        format: &'static str,
        has_metadata: bool,
        payload_bytes: usize,
    ) -> Self {
        let reason = if !has_metadata {
            "buffer carries no metadata block"
        } else {
            "buffer already holds payload data"
        };

        Self::MalformedBuffer {
            format,
            reason: reason.to_string(),
            has_metadata,
            payload_bytes,
        }
    }

    /// Create BufferTooSmall error with diagnostic context
    pub fn buffer_too_small(need: usize, got: usize, context: impl Into<String>) -> Self {
        Self::BufferTooSmall {
            need,
            got,
            context: context.into(),
        }
    }

    /// Create MalformedHeader error
    pub fn malformed_header(
        field: &'static str,
        observed: u64,
        expected: impl Into<String>,
    ) -> Self {
        Self::MalformedHeader {
            field,
            observed,
            expected: expected.into(),
        }
    }

    /// Create MalformedPayload error
    pub fn malformed_payload(
        field: &'static str,
        offset: usize,
        observed: u64,
        expected: impl Into<String>,
    ) -> Self {
        Self::MalformedPayload {
            field,
            offset,
            observed,
            expected: expected.into(),
        }
    }

    /// Create IndexOutOfRange error
    pub fn index_out_of_range(index: usize, count: usize) -> Self {
        Self::IndexOutOfRange { index, count }
    }

    /// Whether this is the writer construction precondition failure
    pub fn is_construction_error(&self) -> bool {
        matches!(self, Self::MalformedBuffer { .. })
    }
}

/// Result type for overlay operations
pub type OverlayResult<T> = std::result::Result<T, OverlayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_buffer_reason() {
        let err = OverlayError::malformed_buffer("udp", false, 0);
        assert!(err.is_construction_error());
        assert!(err.to_string().contains("no metadata block"));

        let err = OverlayError::malformed_buffer("udp", true, 8);
        assert!(err.to_string().contains("already holds payload"));
        assert!(err.to_string().contains("payload: 8 bytes"));
    }

    #[test]
    fn test_layout_error_conversion() {
        let err: OverlayError = LayoutError::UnknownDataType(9).into();
        assert!(matches!(err, OverlayError::Layout(_)));
        assert!(!err.is_construction_error());
    }

    #[test]
    fn test_messages_carry_observed_and_expected() {
        let err = OverlayError::malformed_header("event_size", 3, "at least 16 words");
        assert_eq!(
            err.to_string(),
            "Malformed header: event_size = 3, expected at least 16 words"
        );
    }
}
