//! Whole-chip program from file

use std::fs;
use std::path::Path;

use nandtool_core::chip::{ChipOptions, GeometryDatabase};
use nandtool_core::flash::Region;
use nandtool_core::transport::NandTransport;

use super::{create_progress_bar_with_phase, open_identified, region_bytes};

/// Program consecutive pages from `input`, starting at page 0
///
/// The file holds main+spare bytes per page. Blocks are not erased first.
pub fn run_write(
    transport: &mut dyn NandTransport,
    db: &GeometryDatabase,
    options: ChipOptions,
    input: &Path,
    region: Region,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    println!("Read {} bytes from {:?}", data.len(), input);

    let mut chip = open_identified(transport, db, options)?;
    let pages = chip.page_count().ok_or("Chip geometry is unknown")?;
    let per_page = region_bytes(&chip, region)?;

    if data.len() % per_page != 0 {
        return Err(format!(
            "File size ({} bytes) is not a multiple of the page size ({} bytes)",
            data.len(),
            per_page
        )
        .into());
    }
    let file_pages = data.len() / per_page;
    if file_pages > pages as usize {
        return Err(format!(
            "File holds {} pages but the chip only has {}",
            file_pages, pages
        )
        .into());
    }

    log::warn!("Pages are programmed without erasing; target blocks must be blank");

    let pb = create_progress_bar_with_phase(data.len() as u64, "Writing")?;
    for (page, chunk) in data.chunks(per_page).enumerate() {
        if let Err(e) = chip.write_page(page as u32, chunk, region) {
            pb.abandon_with_message("Write failed!");
            return Err(format!("Programming page {}: {}", page, e).into());
        }
        pb.inc(chunk.len() as u64);
    }
    pb.finish_with_message("Write complete");

    println!("Programmed {} pages", file_pages);
    Ok(())
}
