//! Device identity resolution
//!
//! Identification resets the chip, reads the ID bytes and looks up the first
//! two of them in the geometry table. An unknown ID pair is not an error:
//! the resolved identity then carries zero sizes and every page access on it
//! fails with [`Error::DeviceNotIdentified`](crate::Error::DeviceNotIdentified).

use alloc::string::{String, ToString};
use core::fmt;

use super::table::{lookup, manufacturer_name};
use super::types::GeometryEntry;
use crate::error::Result;
use crate::flash::Region;
use crate::nand::opcodes;
use crate::protocol::{self, MAX_ID_LEN};
use crate::transport::{NandTransport, ReadyWait};

#[cfg(feature = "std")]
use super::database::GeometryDatabase;

/// Session options for identification and page access
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipOptions {
    /// Settle delay after RESET
    pub reset_delay_us: u32,
    /// Ready/busy wait policy for every page operation
    pub ready: ReadyWait,
}

impl Default for ChipOptions {
    fn default() -> Self {
        Self {
            reset_delay_us: opcodes::RESET_DELAY_US,
            ready: ReadyWait::default(),
        }
    }
}

/// Identity of the chip on the other end of a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// Raw bytes returned by READ ID
    pub id_bytes: [u8; MAX_ID_LEN],
    /// Manufacturer name, empty if the first ID byte is unknown
    pub manufacturer: String,
    /// Geometry description, empty if the chip is unknown
    pub description: String,
    /// Main area size of one page
    pub page_size: u32,
    /// Spare area size of one page
    pub oob_size: u32,
    /// Main area size of the chip in MiB
    pub chip_size_mb: u32,
    /// Erase block size in bytes
    pub erase_size: u32,
    /// Address cycles per page access
    pub address_cycles: u8,
    /// Large-page addressing family
    pub large_page: bool,
    /// 16-bit data bus
    pub bus_width_16: bool,
}

impl ResolvedIdentity {
    /// Build an identity from raw ID bytes and the matching table entry
    pub fn from_id_bytes(id_bytes: [u8; MAX_ID_LEN], entry: Option<&GeometryEntry>) -> Self {
        let manufacturer = manufacturer_name(id_bytes[0])
            .map(ToString::to_string)
            .unwrap_or_default();

        match entry {
            Some(e) => Self {
                id_bytes,
                manufacturer,
                description: e.name.to_string(),
                page_size: e.page_size,
                oob_size: e.oob_size,
                chip_size_mb: e.chip_size_mb,
                erase_size: e.erase_size,
                address_cycles: e.address_cycles,
                large_page: e.is_large_page(),
                bus_width_16: e.is_bus_width_16(),
            },
            None => Self {
                id_bytes,
                manufacturer,
                description: String::new(),
                page_size: 0,
                oob_size: 0,
                chip_size_mb: 0,
                erase_size: 0,
                address_cycles: 0,
                large_page: false,
                bus_width_16: false,
            },
        }
    }

    /// Manufacturer ID byte
    pub fn manufacturer_id(&self) -> u8 {
        self.id_bytes[0]
    }

    /// Device ID byte
    pub fn device_id(&self) -> u8 {
        self.id_bytes[1]
    }

    /// Third ID byte (chip info: cell type, internal chip count)
    pub fn chip_info(&self) -> u8 {
        self.id_bytes[2]
    }

    /// True if the geometry is known
    pub fn is_identified(&self) -> bool {
        self.page_size != 0
    }

    /// Number of pages, `None` if the chip is unknown
    pub fn page_count(&self) -> Option<u32> {
        if !self.is_identified() {
            return None;
        }
        Some((self.chip_size_mb as u64 * 1024 * 1024 / self.page_size as u64) as u32)
    }

    /// Number of pages per erase block
    pub fn pages_per_block(&self) -> Option<u32> {
        if !self.is_identified() {
            return None;
        }
        Some(self.erase_size / self.page_size)
    }

    /// Bytes one page produces for `region`
    pub fn region_size(&self, region: Region) -> usize {
        let mut size = 0;
        if region.contains(Region::MAIN) {
            size += self.page_size as usize;
        }
        if region.contains(Region::OOB) {
            size += self.oob_size as usize;
        }
        size
    }
}

impl fmt::Display for ResolvedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = if self.description.is_empty() {
            "unknown"
        } else {
            self.description.as_str()
        };
        writeln!(f, "NAND type:    {}", desc)?;
        if self.manufacturer.is_empty() {
            writeln!(f, "Manufacturer: unknown ({:02X})", self.manufacturer_id())?;
        } else {
            writeln!(f, "Manufacturer: {}", self.manufacturer)?;
        }
        writeln!(f, "Device ID:    {:02X}", self.device_id())?;
        writeln!(f, "Chip info:    {:02X}", self.chip_info())?;
        writeln!(
            f,
            "Chip size:    {}MB (pagesize: {}, OOB: {})",
            self.chip_size_mb, self.page_size, self.oob_size
        )?;
        write!(
            f,
            "{} page detected, needs {} address bytes.",
            if self.large_page { "Large" } else { "Small" },
            self.address_cycles
        )
    }
}

fn read_raw_id<T: NandTransport + ?Sized>(
    transport: &mut T,
    options: &ChipOptions,
) -> Result<[u8; MAX_ID_LEN]> {
    protocol::reset(transport, options.reset_delay_us)?;
    protocol::read_id(transport)
}

fn report(identity: &ResolvedIdentity) {
    if identity.is_identified() {
        log::info!(
            "Found {} {} ({:02X}/{:02X})",
            identity.manufacturer,
            identity.description,
            identity.manufacturer_id(),
            identity.device_id()
        );
        if identity.bus_width_16 {
            log::warn!("Chip has a 16-bit bus; only the low byte lane is transferred");
        }
    } else {
        log::warn!("Unknown NAND chip, ID bytes {:02X?}", identity.id_bytes);
    }
}

/// Identify the chip using the built-in geometry table
pub fn identify<T: NandTransport + ?Sized>(
    transport: &mut T,
    options: &ChipOptions,
) -> Result<ResolvedIdentity> {
    let id = read_raw_id(transport, options)?;
    let identity = ResolvedIdentity::from_id_bytes(id, lookup(id[0], id[1]));
    report(&identity);
    Ok(identity)
}

/// Identify the chip, consulting a runtime database before the built-in table
#[cfg(feature = "std")]
pub fn identify_with<T: NandTransport + ?Sized>(
    transport: &mut T,
    options: &ChipOptions,
    database: &GeometryDatabase,
) -> Result<ResolvedIdentity> {
    let id = read_raw_id(transport, options)?;
    let entry = database
        .find(id[0], id[1])
        .or_else(|| lookup(id[0], id[1]));
    let mut identity = ResolvedIdentity::from_id_bytes(id, entry);
    if let Some(vendor) = database.vendor_name(id[0]) {
        identity.manufacturer = vendor.to_string();
    }
    report(&identity);
    Ok(identity)
}
