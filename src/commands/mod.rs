//! CLI command implementations
//!
//! Every chip command opens a [`NandChip`] session on the transport handed
//! out by the programmer registry and walks the chip page by page.

mod info;
mod list;
mod read;
mod verify;
mod write;

pub use info::run_info;
pub use list::{list_chips, list_programmers};
pub use read::run_read;
pub use verify::run_verify;
pub use write::run_write;

use indicatif::{ProgressBar, ProgressStyle};
use nandtool_core::chip::{ChipOptions, GeometryDatabase};
use nandtool_core::flash::{NandChip, Region};
use nandtool_core::transport::NandTransport;

/// Identify the chip and refuse to go on if its geometry is unknown
pub(crate) fn open_identified<'a>(
    transport: &'a mut dyn NandTransport,
    db: &GeometryDatabase,
    options: ChipOptions,
) -> Result<NandChip<'a, dyn NandTransport + 'a>, Box<dyn std::error::Error>> {
    let chip = NandChip::with_database(transport, options, db)?;
    if !chip.identity().is_identified() {
        println!("{}", chip.identity());
        return Err(format!(
            "Unknown NAND chip (ID {:02X?}); add it to a geometry database with --chip-db",
            &chip.identity().id_bytes[..2]
        )
        .into());
    }
    Ok(chip)
}

/// Bytes per page moved for `region`; an empty selection is refused
pub(crate) fn region_bytes<T: NandTransport + ?Sized>(
    chip: &NandChip<'_, T>,
    region: Region,
) -> Result<usize, Box<dyn std::error::Error>> {
    match chip.region_size(region) {
        0 => Err(format!("Region '{}' is empty on this chip", region).into()),
        n => Ok(n),
    }
}

/// Create a byte progress bar labelled with a phase
pub(crate) fn create_progress_bar_with_phase(
    total: u64,
    phase: &str,
) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
                phase
            ))?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
