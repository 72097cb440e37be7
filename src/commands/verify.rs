//! Compare the chip against a file

use std::fs;
use std::path::Path;

use nandtool_core::chip::{ChipOptions, GeometryDatabase};
use nandtool_core::flash::{mismatches, Region};
use nandtool_core::transport::NandTransport;

use super::{create_progress_bar_with_phase, open_identified, region_bytes};

/// Read `region` of each page the file covers and report every differing byte
pub fn run_verify(
    transport: &mut dyn NandTransport,
    db: &GeometryDatabase,
    options: ChipOptions,
    input: &Path,
    region: Region,
) -> Result<(), Box<dyn std::error::Error>> {
    let expected = fs::read(input)?;
    println!("Read {} bytes from {:?}", expected.len(), input);

    let mut chip = open_identified(transport, db, options)?;
    let pages = chip.page_count().ok_or("Chip geometry is unknown")?;
    let per_page = region_bytes(&chip, region)?;

    let file_pages = expected.len().div_ceil(per_page);
    if file_pages > pages as usize {
        return Err(format!(
            "File holds {} pages but the chip only has {}",
            file_pages, pages
        )
        .into());
    }

    let pb = create_progress_bar_with_phase(expected.len() as u64, "Verifying")?;
    let mut buf = vec![0u8; per_page];
    let mut differing = 0usize;

    for (page, chunk) in expected.chunks(per_page).enumerate() {
        if let Err(e) = chip.read_page(page as u32, &mut buf, region) {
            pb.abandon_with_message("Verification failed!");
            return Err(format!("Reading page {}: {}", page, e).into());
        }
        for m in mismatches(chunk, &buf[..chunk.len()]) {
            pb.println(format!(
                "Verify error: Page {}, byte {}: file 0x{:02X} flash 0x{:02X}",
                page, m.offset, m.expected, m.actual
            ));
            differing += 1;
        }
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    println!(
        "Verify: {} bytes differ between NAND and file.",
        differing
    );
    if differing > 0 {
        return Err("Verification failed".into());
    }
    println!("Verification passed!");
    Ok(())
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use nandtool_dummy::{DummyConfig, DummyNand};

    fn temp_file(name: &str, data: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("nandtool-{}-{}", std::process::id(), name));
        fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_blank_chip_matches_erased_image() {
        let path = temp_file("erased.bin", &[0xFF; 528 * 2]);
        let mut nand = DummyNand::new(DummyConfig::small_page());
        let result = run_verify(
            &mut nand,
            &GeometryDatabase::new(),
            ChipOptions::default(),
            &path,
            Region::BOTH,
        );
        fs::remove_file(&path).unwrap();
        assert!(result.is_ok());
    }

    #[test]
    fn test_flipped_oob_byte_fails() {
        let mut image = vec![0xFFu8; 16 * 3];
        image[16 + 5] = 0xFE;
        let path = temp_file("oob.bin", &image);
        let mut nand = DummyNand::new(DummyConfig::small_page());
        let result = run_verify(
            &mut nand,
            &GeometryDatabase::new(),
            ChipOptions::default(),
            &path,
            Region::OOB,
        );
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
