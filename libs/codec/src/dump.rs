//! Human-readable dumps of detector records
//!
//! Used when a record fails validation and an operator needs to see what
//! actually arrived. Every dump reads only bytes inside the buffer; anything
//! the header claims beyond the extent is reported, never read.

use std::fmt;

use fragment_types::detector::{self, DetectorHeader};
use fragment_types::FragmentBuffer;
use zerocopy::FromBytes;

use crate::overlay::detector::hit_at;

const ROW_BYTES: usize = 16;
const GROUP_BYTES: usize = 4;

/// Hex and ASCII rendering of a byte slice, 16 bytes per row
///
/// ```text
/// 00000000  4d030000 00e1f505 00000000 48000000  |M...........H...|
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.0.chunks(ROW_BYTES).enumerate() {
            write!(f, "{:08x} ", row * ROW_BYTES)?;
            for group in 0..ROW_BYTES / GROUP_BYTES {
                let start = group * GROUP_BYTES;
                let text = chunk
                    .get(start..chunk.len().min(start + GROUP_BYTES))
                    .map(hex::encode)
                    .unwrap_or_default();
                write!(f, " {:<8}", text)?;
            }
            let gutter: String = chunk
                .iter()
                .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
                .collect();
            writeln!(f, "  |{}|", gutter)?;
        }
        Ok(())
    }
}

/// Render the header fields, or a truncation notice if the header does not fit
pub fn dump_header<B: FragmentBuffer>(buffer: &B) -> String {
    let bytes = buffer.payload_bytes();
    match bytes
        .get(..detector::HEADER_BYTES)
        .and_then(DetectorHeader::ref_from)
    {
        Some(header) => format!(
            "header: magic {:?} (0x{:02x}), nhit {}, module {}, unixtime {}, fifty_mhz_time {}",
            header.magic() as char,
            header.magic(),
            header.nhit(),
            header.module_num(),
            header.unixtime(),
            header.fifty_mhz_time()
        ),
        None => format!(
            "header truncated: {} of {} bytes present",
            bytes.len(),
            detector::HEADER_BYTES
        ),
    }
}

/// Render hit `index`, or note that it would lie past the end of the buffer
pub fn dump_hit<B: FragmentBuffer>(buffer: &B, index: usize) -> String {
    match hit_at(buffer.payload_bytes(), index) {
        Ok(hit) => format!(
            "hit {}: magic {:?} (0x{:02x}), channel {}, adc {}",
            index,
            hit.magic() as char,
            hit.magic(),
            hit.channel(),
            hit.adc_signed()
        ),
        Err(_) => format!(
            "hit {}: would be past end of buffer ({} bytes)",
            index,
            buffer.payload_byte_size()
        ),
    }
}

/// Render the header and the first `max_hits` declared hits, one per line
pub fn dump_hits<B: FragmentBuffer>(buffer: &B, max_hits: usize) -> String {
    let mut out = dump_header(buffer);
    let declared = buffer
        .payload_bytes()
        .get(1)
        .map_or(0, |&nhit| usize::from(nhit));
    for index in 0..declared.min(max_hits) {
        out.push('\n');
        out.push_str(&dump_hit(buffer, index));
    }
    if declared > max_hits {
        out.push_str(&format!("\n... {} more hits not shown", declared - max_hits));
    }
    out
}
