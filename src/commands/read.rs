//! Whole-chip dump

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nandtool_core::chip::{ChipOptions, GeometryDatabase};
use nandtool_core::flash::Region;
use nandtool_core::transport::NandTransport;

use super::{create_progress_bar_with_phase, open_identified, region_bytes};

/// Read `region` of every page into `output`
pub fn run_read(
    transport: &mut dyn NandTransport,
    db: &GeometryDatabase,
    options: ChipOptions,
    output: &Path,
    region: Region,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut chip = open_identified(transport, db, options)?;
    let pages = chip.page_count().ok_or("Chip geometry is unknown")?;
    let per_page = region_bytes(&chip, region)?;
    let total = pages as u64 * per_page as u64;

    println!(
        "Reading {} pages ({} region, {} bytes each) to {:?}",
        pages, region, per_page, output
    );

    let mut file = BufWriter::new(File::create(output)?);
    let mut buf = vec![0u8; per_page];
    let pb = create_progress_bar_with_phase(total, "Reading")?;

    for page in 0..pages {
        let n = match chip.read_page(page, &mut buf, region) {
            Ok(n) => n,
            Err(e) => {
                pb.abandon_with_message("Read failed!");
                return Err(format!("Reading page {}: {}", page, e).into());
            }
        };
        file.write_all(&buf[..n])?;
        pb.inc(n as u64);
    }

    file.flush()?;
    pb.finish_with_message("Read complete");
    println!("Wrote {} bytes to {:?}", total, output);

    Ok(())
}
