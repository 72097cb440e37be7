//! Geometry database for runtime loading and lookup
//!
//! This module provides the `GeometryDatabase` type for loading NAND
//! geometry definitions from RON files at runtime. Entries found there take
//! precedence over the built-in table.

use alloc::borrow::Cow;
use alloc::{format, string::String, vec::Vec};
use std::fs;
use std::io;
use std::path::Path;

use super::options::GeometryOptions;
use super::types::{GeometryEntry, SMALL_PAGE_SIZE};

/// Error type for geometry database operations
#[derive(Debug, thiserror::Error)]
pub enum GeometryDbError {
    /// I/O error reading files
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// RON parsing error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// Entry that does not describe an addressable die
    #[error("Validation error: {0}")]
    Validation(String),
}

// ============================================================================
// RON deserialization types (intermediate format)
// ============================================================================

/// Size specification with human-readable units (for RON parsing)
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub enum Size {
    /// Size in bytes
    B(u64),
    /// Size in kibibytes (1024 bytes)
    KiB(u64),
    /// Size in mebibytes (1024 * 1024 bytes)
    MiB(u64),
    /// Size in gibibytes
    GiB(u64),
}

impl Size {
    /// Convert to bytes
    pub fn to_bytes(self) -> u64 {
        match self {
            Size::B(n) => n,
            Size::KiB(n) => n * 1024,
            Size::MiB(n) => n * 1024 * 1024,
            Size::GiB(n) => n * 1024 * 1024 * 1024,
        }
    }
}

/// Single geometry definition in RON format
#[derive(Debug, Clone, serde::Deserialize)]
struct GeometryDef {
    name: String,
    device_id: u8,
    page_size: Size,
    oob_size: u32,
    chip_size: Size,
    erase_size: Size,
    address_cycles: u8,
    /// Defaults to `page_size > 512`
    #[serde(default)]
    large_page: Option<bool>,
    #[serde(default)]
    bus_width_16: bool,
}

/// Vendor definition containing multiple geometries
#[derive(Debug, Clone, serde::Deserialize)]
struct VendorDef {
    vendor: String,
    manufacturer_id: u8,
    chips: Vec<GeometryDef>,
}

fn to_u32(size: Size, what: &str, name: &str) -> Result<u32, GeometryDbError> {
    u32::try_from(size.to_bytes())
        .map_err(|_| GeometryDbError::Validation(format!("{}: {} too large", name, what)))
}

impl GeometryDef {
    fn into_entry(self, manufacturer_id: u8) -> Result<GeometryEntry, GeometryDbError> {
        let page_size = to_u32(self.page_size, "page size", &self.name)?;
        let erase_size = to_u32(self.erase_size, "erase size", &self.name)?;

        let chip_bytes = self.chip_size.to_bytes();
        if chip_bytes % (1024 * 1024) != 0 {
            return Err(GeometryDbError::Validation(format!(
                "{}: chip size is not a whole number of MiB",
                self.name
            )));
        }
        let chip_size_mb = u32::try_from(chip_bytes / (1024 * 1024)).map_err(|_| {
            GeometryDbError::Validation(format!("{}: chip size too large", self.name))
        })?;

        let mut options = GeometryOptions::empty();
        if self.large_page.unwrap_or(page_size > SMALL_PAGE_SIZE) {
            options |= GeometryOptions::LARGE_PAGE;
        }
        if self.bus_width_16 {
            options |= GeometryOptions::BUSWIDTH_16;
        }

        let entry = GeometryEntry {
            name: Cow::Owned(self.name),
            manufacturer_id,
            device_id: self.device_id,
            page_size,
            chip_size_mb,
            erase_size,
            oob_size: self.oob_size,
            options,
            address_cycles: self.address_cycles,
        };

        entry.validate().map_err(|e| {
            GeometryDbError::Validation(format!(
                "{} ({:02X}/{:02X}): {}",
                entry.name, entry.manufacturer_id, entry.device_id, e
            ))
        })?;
        Ok(entry)
    }
}

// ============================================================================
// Geometry database
// ============================================================================

/// Runtime geometry database
///
/// Holds NAND geometry definitions loaded from RON files.
#[derive(Debug, Clone, Default)]
pub struct GeometryDatabase {
    entries: Vec<GeometryEntry>,
    vendors: Vec<(u8, String)>,
}

impl GeometryDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Load definitions from a single RON file
    pub fn load_file(&mut self, path: &Path) -> Result<usize, GeometryDbError> {
        let content = fs::read_to_string(path)?;
        self.load_ron(&content)
    }

    /// Load definitions from a RON string
    ///
    /// Nothing is added if any definition in the string is invalid.
    pub fn load_ron(&mut self, content: &str) -> Result<usize, GeometryDbError> {
        let vendor_def: VendorDef = ron::from_str(content)?;

        let entries = vendor_def
            .chips
            .into_iter()
            .map(|def| def.into_entry(vendor_def.manufacturer_id))
            .collect::<Result<Vec<_>, _>>()?;
        let count = entries.len();

        log::debug!(
            "Loaded {} geometries for {} ({:02X})",
            count,
            vendor_def.vendor,
            vendor_def.manufacturer_id
        );

        if self.vendor_name(vendor_def.manufacturer_id).is_none() {
            self.vendors
                .push((vendor_def.manufacturer_id, vendor_def.vendor));
        }
        self.entries.extend(entries);

        Ok(count)
    }

    /// Load all RON files from a directory
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, GeometryDbError> {
        let mut total = 0;

        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "ron") {
                total += self.load_file(&path)?;
            }
        }

        Ok(total)
    }

    /// Load a file or every RON file in a directory
    pub fn load_path(&mut self, path: &Path) -> Result<usize, GeometryDbError> {
        if path.is_dir() {
            self.load_dir(path)
        } else {
            self.load_file(path)
        }
    }

    /// Get all entries in the database
    pub fn entries(&self) -> &[GeometryEntry] {
        &self.entries
    }

    /// Get the number of entries in the database
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the database is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by its ID byte pair
    pub fn find(&self, manufacturer: u8, device: u8) -> Option<&GeometryEntry> {
        self.entries.iter().find(|e| e.matches(manufacturer, device))
    }

    /// Vendor name declared for a manufacturer ID
    pub fn vendor_name(&self, manufacturer: u8) -> Option<&str> {
        self.vendors
            .iter()
            .find(|(id, _)| *id == manufacturer)
            .map(|(_, name)| name.as_str())
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = &GeometryEntry> {
        self.entries.iter()
    }
}
