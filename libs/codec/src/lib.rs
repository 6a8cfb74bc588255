//! # Fragment Codec - Overlays, Validation and Dumps
//!
//! ## Purpose
//!
//! This crate is the "rules" layer over the pure layouts in `fragment-types`:
//! - Zero-copy reader overlays for line-text, datagram, simulated-ADC and
//!   detector records
//! - Writer overlays that grow a buffer and keep its size field consistent
//! - Layered structural validation of detector records
//! - Hex and field dumps for operators chasing corrupt data
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → [codec] → acquisition / analysis code
//!     ↑           ↓
//! Pure Data    Overlays, Validation,
//! Layouts      Diagnostic Dumps
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Buffer ownership, transport or persistence (callers supply a
//!   [`FragmentBuffer`](fragment_types::FragmentBuffer))
//! - Record layout definitions (belong in `fragment-types`)
//!
//! ## Example
//!
//! ```rust
//! use fragment_codec::{ToyFragment, ToyFragmentWriter};
//! use fragment_types::{Fragment, ToyMetadata};
//!
//! let mut fragment = Fragment::with_metadata(&ToyMetadata::new(7, 12));
//! {
//!     let mut writer = ToyFragmentWriter::new(&mut fragment)?;
//!     writer.set_trigger_number(1)?;
//!     writer.write_adc_values(&[100, 200, 300])?;
//! }
//!
//! let reader = ToyFragment::new(&fragment)?;
//! assert_eq!(reader.adc_value(1)?, 200);
//! assert!(reader.fast_verify(12));
//! # Ok::<(), fragment_codec::OverlayError>(())
//! ```

pub mod dump;
pub mod error;
pub mod overlay;
pub mod validation;

pub use dump::{dump_header, dump_hit, dump_hits, HexDump};
pub use error::{OverlayError, OverlayResult};
pub use overlay::{
    AsciiFragment, AsciiFragmentWriter, DetectorFragment, DetectorFragmentWriter, FragmentReader,
    FragmentWriter, ToyFragment, ToyFragmentWriter, UdpFragment, UdpFragmentWriter, ADC_SENTINEL,
};
pub use validation::{
    DetectorLimits, DetectorValidator, DumpConfig, ValidationConfig, ValidationError,
    ValidationLayer, ValidationReport,
};
