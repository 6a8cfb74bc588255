//! Bounds Checking for Safe Buffer Access
//!
//! Every overlay access into a buffer goes through these helpers, so no
//! accessor can read past the buffer's current extent.

use std::ops::Range;

use crate::error::{OverlayError, OverlayResult};

/// Byte range `offset..offset + size`, or `None` if it overflows `usize`
pub fn byte_range(offset: usize, size: usize) -> Option<Range<usize>> {
    offset.checked_add(size).map(|end| offset..end)
}

/// Whether `offset..offset + size` lies inside a buffer of `len` bytes
pub fn in_bounds(len: usize, offset: usize, size: usize) -> bool {
    matches!(byte_range(offset, size), Some(range) if range.end <= len)
}

/// Check if a buffer has enough bytes for a read operation
pub fn check_buffer_bounds(
    buffer: &[u8],
    offset: usize,
    size: usize,
    context: &str,
) -> OverlayResult<()> {
    if !in_bounds(buffer.len(), offset, size) {
        return Err(OverlayError::buffer_too_small(
            offset.saturating_add(size),
            buffer.len(),
            context,
        ));
    }
    Ok(())
}

/// Safely extract a slice from a buffer with bounds checking
pub fn safe_slice<'a>(
    buffer: &'a [u8],
    offset: usize,
    size: usize,
    context: &str,
) -> OverlayResult<&'a [u8]> {
    check_buffer_bounds(buffer, offset, size, context)?;
    Ok(&buffer[offset..offset + size])
}

/// Safely extract a mutable slice from a buffer with bounds checking
pub fn safe_slice_mut<'a>(
    buffer: &'a mut [u8],
    offset: usize,
    size: usize,
    context: &str,
) -> OverlayResult<&'a mut [u8]> {
    check_buffer_bounds(buffer, offset, size, context)?;
    Ok(&mut buffer[offset..offset + size])
}
