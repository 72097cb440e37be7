//! List commands implementation

use nandtool_core::chip::{manufacturer_name, GeometryDatabase, GeometryEntry, GEOMETRY_TABLE};

use crate::programmers;

/// List all supported programmers
pub fn list_programmers() {
    println!("Supported programmers:");
    println!();
    for p in programmers::available_programmers() {
        println!("  {:8} - {}", p.name, p.description);
        if !p.aliases.is_empty() {
            println!("  {:8}   aliases: {}", "", p.aliases.join(", "));
        }
    }
}

/// List the built-in geometry table followed by runtime database entries
pub fn list_chips(db: &GeometryDatabase, vendor_filter: Option<&str>) {
    println!("Known NAND geometries:");
    println!();
    println!(
        "{:<12} {:<32} {:>5} {:>9} {:>5} {:>6} {:>4}",
        "Vendor", "Name", "ID", "Size", "Page", "OOB", "Addr"
    );
    println!("{}", "-".repeat(80));

    let vendor_of = |entry: &GeometryEntry| -> String {
        db.vendor_name(entry.manufacturer_id)
            .or_else(|| manufacturer_name(entry.manufacturer_id))
            .map(ToString::to_string)
            .unwrap_or_else(|| format!("{:02X}", entry.manufacturer_id))
    };

    for entry in db.iter().chain(GEOMETRY_TABLE.iter()) {
        let vendor = vendor_of(entry);
        if let Some(filter) = vendor_filter {
            if !vendor.to_lowercase().contains(&filter.to_lowercase()) {
                continue;
            }
        }

        println!(
            "{:<12} {:<32} {:02X}{:02X} {:>9} {:>5} {:>6} {:>4}",
            vendor,
            entry.name,
            entry.manufacturer_id,
            entry.device_id,
            format_size(entry.chip_size_bytes()),
            entry.page_size,
            entry.oob_size,
            entry.address_cycles
        );
    }
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 * 1024 {
        format!("{} GiB", bytes / (1024 * 1024 * 1024))
    } else if bytes >= 1024 * 1024 {
        format!("{} MiB", bytes / (1024 * 1024))
    } else {
        format!("{} KiB", bytes / 1024)
    }
}
