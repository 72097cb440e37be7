//! NAND geometry type definitions

use alloc::borrow::Cow;

use super::options::GeometryOptions;
use crate::error::{Error, Result};
use crate::nand::MAX_ADDRESS_CYCLES;

/// Well-known manufacturer ID bytes (first byte of READ ID)
pub mod manufacturer {
    /// Toshiba / Kioxia
    pub const TOSHIBA: u8 = 0x98;
    /// Samsung
    pub const SAMSUNG: u8 = 0xEC;
    /// Fujitsu
    pub const FUJITSU: u8 = 0x04;
    /// National Semiconductor
    pub const NATIONAL: u8 = 0x8F;
    /// Renesas
    pub const RENESAS: u8 = 0x07;
    /// ST Micro / Numonyx
    pub const STMICRO: u8 = 0x20;
    /// Hynix
    pub const HYNIX: u8 = 0xAD;
    /// Micron
    pub const MICRON: u8 = 0x2C;
    /// AMD / Spansion
    pub const AMD: u8 = 0x01;
    /// Macronix
    pub const MACRONIX: u8 = 0xC2;
    /// Winbond
    pub const WINBOND: u8 = 0xEF;
    /// ESMT
    pub const ESMT: u8 = 0xC8;
    /// Intel
    pub const INTEL: u8 = 0x89;
}

/// Page size of the classic small-page dies
pub const SMALL_PAGE_SIZE: u32 = 512;

/// One row of the geometry table
///
/// Entries are keyed by the (manufacturer, device) ID byte pair. The static
/// table holds borrowed names; entries loaded from a runtime database own
/// theirs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryEntry {
    /// Human readable description, e.g. "NAND 128MiB 3,3V 8-bit"
    pub name: Cow<'static, str>,
    /// First READ ID byte
    pub manufacturer_id: u8,
    /// Second READ ID byte
    pub device_id: u8,
    /// Main area size of one page in bytes
    pub page_size: u32,
    /// Total main area size in MiB
    pub chip_size_mb: u32,
    /// Erase block size in bytes
    pub erase_size: u32,
    /// Spare (OOB) area size of one page in bytes
    pub oob_size: u32,
    /// Option flags
    pub options: GeometryOptions,
    /// Number of address cycles for a page access (2-5)
    pub address_cycles: u8,
}

impl GeometryEntry {
    /// Check if this entry matches the given ID pair
    pub fn matches(&self, manufacturer: u8, device: u8) -> bool {
        self.manufacturer_id == manufacturer && self.device_id == device
    }

    /// True for large-page dies (READ0 + READSTART addressing)
    pub fn is_large_page(&self) -> bool {
        self.options.contains(GeometryOptions::LARGE_PAGE)
    }

    /// True for dies with a 16-bit data bus
    pub fn is_bus_width_16(&self) -> bool {
        self.options.contains(GeometryOptions::BUSWIDTH_16)
    }

    /// Number of column address cycles for this addressing family
    pub fn column_cycles(&self) -> u8 {
        if self.is_large_page() {
            2
        } else {
            1
        }
    }

    /// Total main area size in bytes
    pub fn chip_size_bytes(&self) -> u64 {
        self.chip_size_mb as u64 * 1024 * 1024
    }

    /// Number of pages on the die
    pub fn page_count(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        (self.chip_size_bytes() / self.page_size as u64) as u32
    }

    /// Number of pages in one erase block
    pub fn pages_per_block(&self) -> u32 {
        if self.page_size == 0 {
            return 0;
        }
        self.erase_size / self.page_size
    }

    /// Check that the entry describes an addressable die
    ///
    /// The address cycles must cover the column plus every page number, the
    /// page must have a spare area, and a small-page die must have the
    /// 512-byte layout the area pointer commands assume.
    pub fn validate(&self) -> Result<()> {
        let column = self.column_cycles();
        if self.page_size == 0
            || self.oob_size == 0
            || self.chip_size_mb == 0
            || self.address_cycles as usize > MAX_ADDRESS_CYCLES
            || self.address_cycles <= column
        {
            return Err(Error::InvalidGeometry);
        }
        if !self.is_large_page() && self.page_size != SMALL_PAGE_SIZE {
            return Err(Error::InvalidGeometry);
        }
        let row_bits = 8 * (self.address_cycles - column) as u32;
        if row_bits < 32 && self.page_count() as u64 > 1u64 << row_bits {
            return Err(Error::InvalidGeometry);
        }
        Ok(())
    }
}
