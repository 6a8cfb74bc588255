//! # Record Overlays
//!
//! ## Purpose
//!
//! Typed, zero-copy views over fragment buffers. A reader borrows a buffer
//! immutably and may be copied freely; a writer holds the buffer's only
//! mutable borrow and grows it as the record is filled in.
//!
//! ```text
//! FragmentBuffer ──borrow──→ FragmentReader<L>  (header, payload, metadata)
//!        │
//!        └──&mut borrow──→ FragmentWriter<L>   (resize, setters, payload_mut)
//!                                 │
//!                                 └── reader() ──→ FragmentReader<L>
//! ```
//!
//! The word-packed formats share one generic reader and writer parameterised
//! by a [`RecordLayout`](fragment_types::RecordLayout); format-specific
//! accessors live in `impl` blocks per layout. The detector format has no
//! size field and gets its own overlay pair.

pub mod ascii;
pub mod detector;
pub mod reader;
pub mod toy;
pub mod udp;
pub mod writer;

pub use ascii::{AsciiFragment, AsciiFragmentWriter};
pub use detector::{DetectorFragment, DetectorFragmentWriter};
pub use reader::FragmentReader;
pub use toy::{ToyFragment, ToyFragmentWriter, ADC_SENTINEL};
pub use udp::{UdpFragment, UdpFragmentWriter};
pub use writer::FragmentWriter;
