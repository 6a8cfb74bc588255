//! # Fragment Types
//!
//! Pure data definitions for fragment overlays: the backing buffer interface,
//! the fixed binary layouts of each record format, and the unit arithmetic
//! that relates payload elements to header words.
//!
//! ## Design Philosophy
//!
//! - **Pinned Layouts**: every header, metadata block and hit is a `#[repr(C)]`
//!   zerocopy struct of little-endian fields; packed bit-fields are decoded with
//!   explicit shifts and masks, never compiler bitfields
//! - **Zero-Copy**: all layout structs are `Unaligned` and can be viewed in place
//! - **Compile-Time Checks**: header sizes are asserted against their declared word counts
//! - **No Rules Here**: overlays, validation and diagnostics live in `fragment-codec`
//!
//! ## Quick Start
//!
//! ```rust
//! use fragment_types::{AsciiLayout, AsciiMetadata, Fragment, FragmentBuffer, RecordLayout};
//!
//! // A producer creates a buffer holding only its metadata
//! let fragment = Fragment::with_metadata(&AsciiMetadata::new(5));
//! assert!(fragment.has_metadata());
//! assert_eq!(fragment.payload_byte_size(), 0);
//!
//! // Five characters need five one-byte words plus the 16-word header
//! assert_eq!(AsciiLayout::event_size_for(5), Ok(21));
//! ```
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → libs/codec
//!     ↑             ↓
//! Layouts      Overlays, Validation, Dump
//! Buffer API   Error taxonomy
//! ```

pub mod buffer;
pub mod errors;
pub mod format;
pub mod layout;
pub mod units;

pub use buffer::{Fragment, FragmentBuffer};
pub use errors::{LayoutError, LayoutResult};
pub use format::FragmentFormat;
pub use layout::detector::{self, DetectorHeader, DetectorHit};
pub use layout::toy::AdcSample;
pub use layout::{
    AsciiHeader, AsciiLayout, AsciiMetadata, DataType, RecordLayout, ToyHeader, ToyLayout,
    ToyMetadata, UdpHeader, UdpLayout, UdpMetadata, EVENT_SIZE_BITS, EVENT_SIZE_MAX,
};
pub use units::{elements_to_words, round_up_to_allocation_unit, words_to_elements};
