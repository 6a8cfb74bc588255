//! # Record Validation
//!
//! ## Purpose
//!
//! Bounds-checked buffer access shared by every overlay, plus the layered
//! structural validator for detector records and its configuration.
//!
//! ```text
//! raw buffer → DetectorValidator → go / no-go
//!                  │                  │
//!                  │ ValidationConfig └─ ValidationReport (every issue)
//!                  └─ bounds::safe_slice for every read
//! ```

pub mod bounds;
pub mod config;
pub mod detector;

pub use bounds::{byte_range, check_buffer_bounds, in_bounds, safe_slice, safe_slice_mut};
pub use config::{DetectorLimits, DumpConfig, ValidationConfig};
pub use detector::{DetectorValidator, ValidationError, ValidationLayer, ValidationReport};
