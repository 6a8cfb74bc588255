//! Bit-field encode/decode over plain integers
//!
//! Headers declare their packed fields LSB-first within a little-endian word:
//! the first declared field occupies the lowest bits. These helpers are the
//! only place that knows about shifts and masks.

use crate::errors::{LayoutError, LayoutResult};

/// Largest value representable in a field `bits` wide
#[inline]
pub const fn field_max(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Read the `bits`-wide field starting at bit `shift`
#[inline]
pub const fn extract(word: u64, shift: u32, bits: u32) -> u64 {
    (word >> shift) & field_max(bits)
}

/// Write `value` into the `bits`-wide field starting at bit `shift`
///
/// Bits outside the field are preserved. Fails if `value` does not fit.
pub fn insert(
    word: u64,
    shift: u32,
    bits: u32,
    value: u64,
    field: &'static str,
) -> LayoutResult<u64> {
    let max = field_max(bits);
    if value > max {
        return Err(LayoutError::field_overflow(field, value, bits));
    }
    Ok((word & !(max << shift)) | (value << shift))
}

/// Write `value` into the field, keeping only its low `bits` bits
#[inline]
pub const fn insert_masked(word: u64, shift: u32, bits: u32, value: u64) -> u64 {
    let max = field_max(bits);
    (word & !(max << shift)) | ((value & max) << shift)
}
