//! Multi-hit detector record layout
//!
//! One record per module readout: a 12-byte header followed by `nhit` 4-byte
//! hits. The record size is not stored; it follows from the hit count, and
//! the backing buffer's own extent must corroborate it.
//!
//! ```text
//! header (12 bytes)
//! byte 0      u8       magic 'M'
//! byte 1      u8       nhit
//! byte 2..4   u16 LE   module number
//! byte 4..8   i32 LE   unix time (seconds)
//! byte 8..12  u32 LE   50 MHz counter
//!
//! hit (4 bytes)
//! byte 0      u8       magic 'H'
//! byte 1      u8       channel
//! byte 2..4   u16 LE   ADC value
//! ```

use std::mem::size_of;
use zerocopy::byteorder::{LittleEndian, I32, U16, U32};
use zerocopy::{AsBytes, FromBytes, FromZeroes, Unaligned};

/// Marker byte opening every detector header
pub const HEADER_MAGIC: u8 = b'M';

/// Marker byte opening every hit
pub const HIT_MAGIC: u8 = b'H';

/// Header size in bytes
pub const HEADER_BYTES: usize = 12;

/// Hit size in bytes
pub const HIT_BYTES: usize = 4;

/// Channels per module; also the most hits one readout can carry
pub const CHANNEL_COUNT: usize = 64;

/// Meaningful bits of the module's ADC
pub const ADC_BITS: u32 = 12;

/// Exclusive upper bound of a valid ADC value
pub const ADC_LIMIT: i32 = 1 << ADC_BITS;

/// Earliest plausible unix time (2017-07-14); older stamps indicate corruption
pub const MIN_UNIX_TIME: i32 = 1_500_000_000;

/// Detector record header (12 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeroes, FromBytes, AsBytes, Unaligned)]
pub struct DetectorHeader {
    magic: u8,
    nhit: u8,
    module_num: U16<LittleEndian>,
    unixtime: I32<LittleEndian>,
    fifty_mhz_time: U32<LittleEndian>,
}

impl DetectorHeader {
    pub fn new(nhit: u8, module_num: u16, unixtime: i32, fifty_mhz_time: u32) -> Self {
        Self {
            magic: HEADER_MAGIC,
            nhit,
            module_num: U16::new(module_num),
            unixtime: I32::new(unixtime),
            fifty_mhz_time: U32::new(fifty_mhz_time),
        }
    }

    pub fn magic(&self) -> u8 {
        self.magic
    }

    pub fn set_magic(&mut self, magic: u8) {
        self.magic = magic;
    }

    /// Declared hit count
    pub fn nhit(&self) -> u8 {
        self.nhit
    }

    pub fn set_nhit(&mut self, nhit: u8) {
        self.nhit = nhit;
    }

    pub fn module_num(&self) -> u16 {
        self.module_num.get()
    }

    pub fn set_module_num(&mut self, module_num: u16) {
        self.module_num.set(module_num);
    }

    pub fn unixtime(&self) -> i32 {
        self.unixtime.get()
    }

    pub fn set_unixtime(&mut self, unixtime: i32) {
        self.unixtime.set(unixtime);
    }

    /// Sub-second counter ticking at 50 MHz
    pub fn fifty_mhz_time(&self) -> u32 {
        self.fifty_mhz_time.get()
    }

    pub fn set_fifty_mhz_time(&mut self, fifty_mhz_time: u32) {
        self.fifty_mhz_time.set(fifty_mhz_time);
    }
}

/// One channel hit (4 bytes)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromZeroes, FromBytes, AsBytes, Unaligned)]
pub struct DetectorHit {
    magic: u8,
    channel: u8,
    adc: U16<LittleEndian>,
}

impl DetectorHit {
    pub fn new(channel: u8, adc: u16) -> Self {
        Self {
            magic: HIT_MAGIC,
            channel,
            adc: U16::new(adc),
        }
    }

    pub fn magic(&self) -> u8 {
        self.magic
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// ADC value as stored
    pub fn adc(&self) -> u16 {
        self.adc.get()
    }

    /// ADC value read as the signed quantity the module firmware produces
    ///
    /// Valid readings are non-negative; a raw value with the top bit set
    /// reads as negative here.
    pub fn adc_signed(&self) -> i16 {
        self.adc.get() as i16
    }
}

/// Byte size of a record carrying `n_hits` hits, before allocation rounding
pub const fn record_bytes(n_hits: usize) -> usize {
    HEADER_BYTES + n_hits * HIT_BYTES
}

const _: () = assert!(size_of::<DetectorHeader>() == HEADER_BYTES, "DetectorHeader size changed");
const _: () = assert!(size_of::<DetectorHit>() == HIT_BYTES, "DetectorHit size changed");
