//! Chip identification display

use nandtool_core::chip::{ChipOptions, GeometryDatabase};
use nandtool_core::flash::NandChip;
use nandtool_core::transport::NandTransport;

/// Identify the chip and print what was found
pub fn run_info(
    transport: &mut dyn NandTransport,
    db: &GeometryDatabase,
    options: ChipOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let chip = NandChip::with_database(transport, options, db)?;
    let identity = chip.identity();

    println!("NAND Chip Information");
    println!("=====================");
    println!();
    println!("{}", identity);

    let id: Vec<String> = identity.id_bytes.iter().map(|b| format!("{:02X}", b)).collect();
    println!("ID bytes:     {}", id.join(" "));

    if let (Some(pages), Some(per_block)) = (identity.page_count(), identity.pages_per_block()) {
        println!(
            "Pages:        {} ({} per {} KiB erase block)",
            pages,
            per_block,
            identity.erase_size / 1024
        );
    }
    if identity.bus_width_16 {
        println!("Bus width:    16-bit");
    }

    Ok(())
}
