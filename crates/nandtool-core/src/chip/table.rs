//! Static geometry and manufacturer tables

use alloc::borrow::Cow;

use super::options::GeometryOptions;
use super::types::{manufacturer as mfr, GeometryEntry, SMALL_PAGE_SIZE};

const KIB: u32 = 1024;

const fn small(name: &'static str, manufacturer_id: u8, device_id: u8, chip_size_mb: u32, address_cycles: u8) -> GeometryEntry {
    GeometryEntry {
        name: Cow::Borrowed(name),
        manufacturer_id,
        device_id,
        page_size: SMALL_PAGE_SIZE,
        chip_size_mb,
        erase_size: if chip_size_mb <= 8 { 8 * KIB } else { 16 * KIB },
        oob_size: 16,
        options: GeometryOptions::empty(),
        address_cycles,
    }
}

const fn small16(name: &'static str, manufacturer_id: u8, device_id: u8, chip_size_mb: u32, address_cycles: u8) -> GeometryEntry {
    let mut e = small(name, manufacturer_id, device_id, chip_size_mb, address_cycles);
    e.options = GeometryOptions::BUSWIDTH_16;
    e
}

const fn large(name: &'static str, manufacturer_id: u8, device_id: u8, chip_size_mb: u32) -> GeometryEntry {
    GeometryEntry {
        name: Cow::Borrowed(name),
        manufacturer_id,
        device_id,
        page_size: 2048,
        chip_size_mb,
        erase_size: 128 * KIB,
        oob_size: 64,
        options: GeometryOptions::LARGE_PAGE,
        address_cycles: 5,
    }
}

const fn large16(name: &'static str, manufacturer_id: u8, device_id: u8, chip_size_mb: u32) -> GeometryEntry {
    let mut e = large(name, manufacturer_id, device_id, chip_size_mb);
    e.options = GeometryOptions::LARGE_PAGE.union(GeometryOptions::BUSWIDTH_16);
    e
}

/// Known NAND dies, keyed by (manufacturer, device) ID bytes
///
/// Lookup is exact match on both bytes, first match wins.
pub static GEOMETRY_TABLE: &[GeometryEntry] = &[
    // Samsung small page
    small("NAND 8MiB 3,3V 8-bit", mfr::SAMSUNG, 0xE6, 8, 3),
    small("NAND 16MiB 1,8V 8-bit", mfr::SAMSUNG, 0x33, 16, 3),
    small("NAND 16MiB 3,3V 8-bit", mfr::SAMSUNG, 0x73, 16, 3),
    small16("NAND 16MiB 1,8V 16-bit", mfr::SAMSUNG, 0x43, 16, 3),
    small16("NAND 16MiB 3,3V 16-bit", mfr::SAMSUNG, 0x53, 16, 3),
    small("NAND 32MiB 1,8V 8-bit", mfr::SAMSUNG, 0x35, 32, 3),
    small("NAND 32MiB 3,3V 8-bit", mfr::SAMSUNG, 0x75, 32, 3),
    small16("NAND 32MiB 1,8V 16-bit", mfr::SAMSUNG, 0x45, 32, 3),
    small16("NAND 32MiB 3,3V 16-bit", mfr::SAMSUNG, 0x55, 32, 3),
    small("NAND 64MiB 1,8V 8-bit", mfr::SAMSUNG, 0x36, 64, 4),
    small("NAND 64MiB 3,3V 8-bit", mfr::SAMSUNG, 0x76, 64, 4),
    small("NAND 128MiB 1,8V 8-bit", mfr::SAMSUNG, 0x78, 128, 4),
    small("NAND 128MiB 3,3V 8-bit", mfr::SAMSUNG, 0x79, 128, 4),
    small("NAND 256MiB 3,3V 8-bit", mfr::SAMSUNG, 0x71, 256, 4),
    // Samsung large page
    large("NAND 128MiB 1,8V 8-bit", mfr::SAMSUNG, 0xA1, 128),
    large("NAND 128MiB 3,3V 8-bit", mfr::SAMSUNG, 0xF1, 128),
    large16("NAND 128MiB 1,8V 16-bit", mfr::SAMSUNG, 0xB1, 128),
    large16("NAND 128MiB 3,3V 16-bit", mfr::SAMSUNG, 0xC1, 128),
    large("NAND 256MiB 1,8V 8-bit", mfr::SAMSUNG, 0xAA, 256),
    large("NAND 256MiB 3,3V 8-bit", mfr::SAMSUNG, 0xDA, 256),
    large("NAND 512MiB 1,8V 8-bit", mfr::SAMSUNG, 0xAC, 512),
    large("NAND 512MiB 3,3V 8-bit", mfr::SAMSUNG, 0xDC, 512),
    large("NAND 1GiB 1,8V 8-bit", mfr::SAMSUNG, 0xA3, 1024),
    large("NAND 1GiB 3,3V 8-bit", mfr::SAMSUNG, 0xD3, 1024),
    // Toshiba
    small("NAND 16MiB 3,3V 8-bit", mfr::TOSHIBA, 0x73, 16, 3),
    small("NAND 32MiB 3,3V 8-bit", mfr::TOSHIBA, 0x75, 32, 3),
    small("NAND 64MiB 3,3V 8-bit", mfr::TOSHIBA, 0x76, 64, 4),
    small("NAND 128MiB 3,3V 8-bit", mfr::TOSHIBA, 0x79, 128, 4),
    large("NAND 128MiB 3,3V 8-bit", mfr::TOSHIBA, 0xF1, 128),
    large("NAND 256MiB 3,3V 8-bit", mfr::TOSHIBA, 0xDA, 256),
    large("NAND 512MiB 3,3V 8-bit", mfr::TOSHIBA, 0xDC, 512),
    // ST Micro
    small("NAND 16MiB 3,3V 8-bit", mfr::STMICRO, 0x73, 16, 3),
    small("NAND 32MiB 3,3V 8-bit", mfr::STMICRO, 0x75, 32, 3),
    small("NAND 64MiB 3,3V 8-bit", mfr::STMICRO, 0x76, 64, 4),
    small("NAND 128MiB 3,3V 8-bit", mfr::STMICRO, 0x79, 128, 4),
    large("NAND 128MiB 3,3V 8-bit", mfr::STMICRO, 0xF1, 128),
    large("NAND 256MiB 3,3V 8-bit", mfr::STMICRO, 0xDA, 256),
    large("NAND 512MiB 3,3V 8-bit", mfr::STMICRO, 0xDC, 512),
    // Hynix
    small("NAND 16MiB 3,3V 8-bit", mfr::HYNIX, 0x73, 16, 3),
    small("NAND 32MiB 3,3V 8-bit", mfr::HYNIX, 0x75, 32, 3),
    small("NAND 64MiB 3,3V 8-bit", mfr::HYNIX, 0x76, 64, 4),
    small("NAND 128MiB 3,3V 8-bit", mfr::HYNIX, 0x79, 128, 4),
    large("NAND 128MiB 3,3V 8-bit", mfr::HYNIX, 0xF1, 128),
    large("NAND 256MiB 3,3V 8-bit", mfr::HYNIX, 0xDA, 256),
    large("NAND 512MiB 3,3V 8-bit", mfr::HYNIX, 0xDC, 512),
    large("NAND 1GiB 3,3V 8-bit", mfr::HYNIX, 0xD3, 1024),
    // Micron
    large("NAND 128MiB 3,3V 8-bit", mfr::MICRON, 0xF1, 128),
    large("NAND 256MiB 3,3V 8-bit", mfr::MICRON, 0xDA, 256),
    large("NAND 512MiB 3,3V 8-bit", mfr::MICRON, 0xDC, 512),
    large("NAND 1GiB 3,3V 8-bit", mfr::MICRON, 0xD3, 1024),
    // AMD / Spansion
    large("NAND 128MiB 3,3V 8-bit", mfr::AMD, 0xF1, 128),
    large("NAND 256MiB 3,3V 8-bit", mfr::AMD, 0xDA, 256),
    // Macronix
    large("NAND 128MiB 3,3V 8-bit", mfr::MACRONIX, 0xF1, 128),
    large("NAND 256MiB 3,3V 8-bit", mfr::MACRONIX, 0xDA, 256),
    // Winbond
    large("NAND 128MiB 3,3V 8-bit", mfr::WINBOND, 0xF1, 128),
    large("NAND 256MiB 3,3V 8-bit", mfr::WINBOND, 0xDA, 256),
    // ESMT
    large("NAND 128MiB 3,3V 8-bit", mfr::ESMT, 0xF1, 128),
];

/// Manufacturer ID byte to name
pub static MANUFACTURERS: &[(u8, &str)] = &[
    (mfr::TOSHIBA, "Toshiba"),
    (mfr::SAMSUNG, "Samsung"),
    (mfr::FUJITSU, "Fujitsu"),
    (mfr::NATIONAL, "National"),
    (mfr::RENESAS, "Renesas"),
    (mfr::STMICRO, "ST Micro"),
    (mfr::HYNIX, "Hynix"),
    (mfr::MICRON, "Micron"),
    (mfr::AMD, "AMD/Spansion"),
    (mfr::MACRONIX, "Macronix"),
    (mfr::WINBOND, "Winbond"),
    (mfr::ESMT, "ESMT"),
    (mfr::INTEL, "Intel"),
];

/// Look up the geometry of a die by its first two ID bytes
pub fn lookup(manufacturer: u8, device: u8) -> Option<&'static GeometryEntry> {
    GEOMETRY_TABLE.iter().find(|e| e.matches(manufacturer, device))
}

/// Name of the manufacturer with the given ID byte
pub fn manufacturer_name(id: u8) -> Option<&'static str> {
    MANUFACTURERS
        .iter()
        .find(|(m, _)| *m == id)
        .map(|(_, name)| *name)
}
