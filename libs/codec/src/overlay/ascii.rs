//! Line-text record overlays

use std::borrow::Cow;
use std::fmt;

use fragment_types::{AsciiLayout, FragmentBuffer};

use super::{FragmentReader, FragmentWriter};
use crate::error::OverlayResult;

/// Read-only line-text overlay
pub type AsciiFragment<'a, B> = FragmentReader<'a, AsciiLayout, B>;

/// Writable line-text overlay
pub type AsciiFragmentWriter<'a, B> = FragmentWriter<'a, AsciiLayout, B>;

impl<'a, B: FragmentBuffer> FragmentReader<'a, AsciiLayout, B> {
    /// Line number of the contained text
    pub fn line_number(&self) -> u64 {
        self.header().line_number()
    }

    /// Number of characters in the line
    pub fn total_line_characters(&self) -> OverlayResult<usize> {
        self.payload_element_count()
    }

    /// The line's characters
    pub fn line(&self) -> OverlayResult<&'a [u8]> {
        self.payload()
    }

    /// The line as text, replacing invalid UTF-8
    pub fn line_lossy(&self) -> OverlayResult<Cow<'a, str>> {
        Ok(String::from_utf8_lossy(self.line()?))
    }

    /// Character count recorded by the producer in the metadata block
    pub fn chars_in_line(&self) -> OverlayResult<u32> {
        Ok(self.metadata()?.chars_in_line())
    }
}

impl<B: FragmentBuffer> FragmentWriter<'_, AsciiLayout, B> {
    pub fn set_line_number(&mut self, line_number: u64) -> OverlayResult<()> {
        self.header_mut()?.set_line_number(line_number);
        Ok(())
    }

    /// Resize to `line.len()` characters and copy the line in
    pub fn write_line(&mut self, line: &str) -> OverlayResult<()> {
        self.write_elements(line.as_bytes())
    }
}

impl<B: FragmentBuffer> fmt::Display for FragmentReader<'_, AsciiLayout, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AsciiFragment line_number: {}, event_size: {}",
            self.line_number(),
            self.event_size()
        )?;
        match self.line_lossy() {
            Ok(line) => write!(f, ", line: {:?}", line),
            Err(err) => write!(f, ", line unreadable: {}", err),
        }
    }
}
