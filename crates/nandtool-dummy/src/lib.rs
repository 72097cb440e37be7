//! nandtool-dummy - In-memory NAND flash emulator for testing
//!
//! This crate provides a transport that emulates a parallel NAND chip in
//! memory. It decodes the command, address and data cycles the core sends,
//! keeps a log of them and can inject faults (short reads, failed programs,
//! a stuck busy line). It's useful for testing and dry runs without
//! hardware.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use nandtool_core::chip::{self, GeometryEntry};
use nandtool_core::error::{Error, Result};
use nandtool_core::nand::{opcodes, Status};
use nandtool_core::transport::{NandTransport, TransportInfo};

/// Transport description for programmer listings
pub const TRANSPORT_INFO: TransportInfo = TransportInfo {
    name: "dummy",
    aliases: &[],
    description: "In-memory NAND emulator (id=<MMDD hex>,busy=<polls>)",
};

/// Fault injection knobs
#[derive(Debug, Clone, Default)]
pub struct DummyFaults {
    /// Return at most this many bytes from each data read
    pub short_read: Option<usize>,
    /// Pages whose program operation reports a failure
    pub fail_program: Vec<u32>,
    /// The ready/busy line never reports ready
    pub stuck_busy: bool,
}

/// Configuration for the emulated chip
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Bytes returned by READ ID
    pub id_bytes: [u8; 8],
    /// Main area bytes per page
    pub page_size: u32,
    /// Spare bytes per page
    pub oob_size: u32,
    /// Chip size in MiB
    pub chip_size_mb: u32,
    /// Address cycles the chip expects for page operations
    pub address_cycles: u8,
    /// Large-page command set
    pub large_page: bool,
    /// Ready samples that report busy after each array operation
    pub busy_polls: u32,
    /// Injected faults
    pub faults: DummyFaults,
}

impl DummyConfig {
    /// Emulate the chip described by a geometry entry
    pub fn from_geometry(entry: &GeometryEntry) -> Self {
        Self {
            id_bytes: [entry.manufacturer_id, entry.device_id, 0x00, 0x95, 0x40, 0x00, 0x00, 0x00],
            page_size: entry.page_size,
            oob_size: entry.oob_size,
            chip_size_mb: entry.chip_size_mb,
            address_cycles: entry.address_cycles,
            large_page: entry.is_large_page(),
            busy_polls: 1,
            faults: DummyFaults::default(),
        }
    }

    /// Emulate the table entry for an ID pair
    pub fn from_id(manufacturer: u8, device: u8) -> Option<Self> {
        chip::lookup(manufacturer, device).map(Self::from_geometry)
    }

    /// Samsung 32 MiB small-page chip (512 + 16, 3 address cycles)
    pub fn small_page() -> Self {
        Self {
            id_bytes: [0xEC, 0x75, 0xA5, 0xBD, 0x00, 0x00, 0x00, 0x00],
            page_size: 512,
            oob_size: 16,
            chip_size_mb: 32,
            address_cycles: 3,
            large_page: false,
            ..Self::default()
        }
    }

    fn full_page(&self) -> usize {
        (self.page_size + self.oob_size) as usize
    }

    fn page_count(&self) -> u32 {
        (self.chip_size_mb as u64 * 1024 * 1024 / self.page_size as u64) as u32
    }
}

impl Default for DummyConfig {
    /// Samsung 128 MiB large-page chip (2048 + 64, 5 address cycles)
    fn default() -> Self {
        Self {
            id_bytes: [0xEC, 0xF1, 0x00, 0x95, 0x40, 0x00, 0x00, 0x00],
            page_size: 2048,
            oob_size: 64,
            chip_size_mb: 128,
            address_cycles: 5,
            large_page: true,
            busy_polls: 1,
            faults: DummyFaults::default(),
        }
    }
}

/// Parse dummy options from the programmer string
///
/// Supported options:
/// - `id=<hex>`: manufacturer and device byte, e.g. `id=EC75`
/// - `busy=<n>`: busy samples after each array operation
pub fn parse_options(options: &[(&str, &str)]) -> core::result::Result<DummyConfig, String> {
    let mut config = DummyConfig::default();

    for (key, value) in options {
        match *key {
            "id" => {
                let raw = u16::from_str_radix(value, 16)
                    .map_err(|_| format!("Invalid id value: {}", value))?;
                let (m, d) = ((raw >> 8) as u8, raw as u8);
                let busy = config.busy_polls;
                config = DummyConfig::from_id(m, d)
                    .ok_or_else(|| format!("No geometry for id {:02X}{:02X}", m, d))?;
                config.busy_polls = busy;
            }
            "busy" => {
                config.busy_polls = value
                    .parse()
                    .map_err(|_| format!("Invalid busy value: {}", value))?;
            }
            _ => {
                return Err(format!("Unknown dummy option: {}", key));
            }
        }
    }

    Ok(config)
}

/// One recorded bus operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusOp {
    /// Command latch
    Command(u8),
    /// Address cycles
    Address(Vec<u8>),
    /// Data read of the given length
    Read(usize),
    /// Data write of the given length
    Write(usize),
}

/// What the next address cycles belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Idle,
    ReadId,
    Read,
    Program,
}

/// What the data bus currently serves
#[derive(Debug, Clone, PartialEq, Eq)]
enum Output {
    None,
    Id(usize),
    Status,
    /// Page register contents from this offset on
    Page { page: u32, offset: usize },
}

/// Dummy NAND chip
///
/// Emulates a NAND chip in memory. Pages that were never programmed read
/// as erased (0xFF).
pub struct DummyNand {
    config: DummyConfig,
    pages: BTreeMap<u32, Vec<u8>>,
    log: Vec<BusOp>,
    pending: Pending,
    /// Small-page area pointer (READ0 / READ1 / READOOB)
    pointer: u8,
    /// Latched read target waiting for READSTART (large page)
    read_target: Option<(u32, usize)>,
    /// Program target and page register being filled
    program: Option<(u32, usize, Vec<u8>)>,
    output: Output,
    status: u8,
    busy: u32,
}

impl DummyNand {
    /// Create a new emulated chip with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        Self {
            config,
            pages: BTreeMap::new(),
            log: Vec::new(),
            pending: Pending::Idle,
            pointer: opcodes::READ0,
            read_target: None,
            program: None,
            output: Output::None,
            status: (Status::READY | Status::ARRAY_READY | Status::WRITE_ENABLED).bits(),
            busy: 0,
        }
    }

    /// Create a new emulated chip with the default (large-page) configuration
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Get a mutable reference to the fault injection knobs
    pub fn faults_mut(&mut self) -> &mut DummyFaults {
        &mut self.config.faults
    }

    /// Recorded bus operations
    pub fn log(&self) -> &[BusOp] {
        &self.log
    }

    /// Forget the recorded bus operations
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Address sequences in the log
    pub fn addresses(&self) -> Vec<&[u8]> {
        self.log
            .iter()
            .filter_map(|op| match op {
                BusOp::Address(a) => Some(a.as_slice()),
                _ => None,
            })
            .collect()
    }

    /// Full contents (main followed by spare bytes) of a page
    pub fn page(&self, page: u32) -> Vec<u8> {
        self.pages
            .get(&page)
            .cloned()
            .unwrap_or_else(|| vec![0xFF; self.config.full_page()])
    }

    /// Store page contents directly, bypassing the bus
    ///
    /// Shorter data is padded with 0xFF.
    pub fn load_page(&mut self, page: u32, data: &[u8]) {
        let mut contents = vec![0xFF; self.config.full_page()];
        let len = data.len().min(contents.len());
        contents[..len].copy_from_slice(&data[..len]);
        self.pages.insert(page, contents);
    }

    fn start_busy(&mut self) {
        self.busy = self.config.busy_polls;
    }

    fn pointer_base(&self) -> usize {
        match self.pointer {
            opcodes::READ1 => opcodes::SMALL_PAGE_HALF as usize,
            opcodes::READOOB => self.config.page_size as usize,
            _ => 0,
        }
    }

    /// Split address cycles into column and page
    fn decode_address(&self, cycles: &[u8]) -> Result<(usize, u32)> {
        if cycles.len() != self.config.address_cycles as usize {
            log::warn!(
                "dummy: expected {} address cycles, got {}",
                self.config.address_cycles,
                cycles.len()
            );
            return Err(Error::TransportError);
        }
        let column_cycles = if self.config.large_page { 2 } else { 1 };
        let (column, row) = cycles.split_at(column_cycles);

        let column = column
            .iter()
            .rev()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);
        let page = row
            .iter()
            .take(4)
            .rev()
            .fold(0u32, |acc, &b| (acc << 8) | b as u32);

        if page >= self.config.page_count() {
            log::warn!("dummy: page {} beyond end of chip", page);
            return Err(Error::TransportError);
        }
        Ok((column, page))
    }

    fn handle_command(&mut self, opcode: u8) -> Result<()> {
        match opcode {
            opcodes::RESET => {
                self.pending = Pending::Idle;
                self.pointer = opcodes::READ0;
                self.read_target = None;
                self.program = None;
                self.output = Output::None;
                self.start_busy();
            }
            opcodes::READID => {
                self.pending = Pending::ReadId;
            }
            opcodes::STATUS => {
                self.output = Output::Status;
            }
            opcodes::READ0 => {
                self.pointer = opcodes::READ0;
                self.pending = Pending::Read;
            }
            opcodes::READ1 | opcodes::READOOB if !self.config.large_page => {
                self.pointer = opcode;
                self.pending = Pending::Read;
            }
            opcodes::READSTART if self.config.large_page => {
                let (page, column) = self.read_target.take().ok_or_else(|| {
                    log::warn!("dummy: READSTART without address");
                    Error::TransportError
                })?;
                self.output = Output::Page {
                    page,
                    offset: column,
                };
                self.start_busy();
            }
            opcodes::SEQIN => {
                self.pending = Pending::Program;
            }
            opcodes::PAGEPROG => {
                let (page, _, data) = self.program.take().ok_or_else(|| {
                    log::warn!("dummy: PAGEPROG without SEQIN");
                    Error::TransportError
                })?;
                self.commit(page, &data);
                self.start_busy();
            }
            _ => {
                log::warn!("dummy: unsupported command 0x{:02X}", opcode);
                return Err(Error::TransportError);
            }
        }
        Ok(())
    }

    fn handle_address(&mut self, cycles: &[u8]) -> Result<()> {
        match self.pending {
            Pending::ReadId => {
                self.output = Output::Id(0);
            }
            Pending::Read => {
                let (column, page) = self.decode_address(cycles)?;
                if self.config.large_page {
                    self.read_target = Some((page, column));
                } else {
                    self.output = Output::Page {
                        page,
                        offset: self.pointer_base() + column,
                    };
                    self.start_busy();
                }
            }
            Pending::Program => {
                let (column, page) = self.decode_address(cycles)?;
                let column = if self.config.large_page {
                    column
                } else {
                    self.pointer_base() + column
                };
                self.program = Some((page, column, vec![0xFF; self.config.full_page()]));
            }
            Pending::Idle => {
                log::warn!("dummy: address cycles without a command");
                return Err(Error::TransportError);
            }
        }
        self.pending = Pending::Idle;
        Ok(())
    }

    fn commit(&mut self, page: u32, data: &[u8]) {
        if self.config.faults.fail_program.contains(&page) {
            log::debug!("dummy: injecting program failure on page {}", page);
            self.status |= Status::FAIL.bits();
            return;
        }
        self.status &= !Status::FAIL.bits();

        let full = self.config.full_page();
        let stored = self
            .pages
            .entry(page)
            .or_insert_with(|| vec![0xFF; full]);
        // Programming can only clear bits
        for (cell, &byte) in stored.iter_mut().zip(data.iter()) {
            *cell &= byte;
        }
    }
}

impl NandTransport for DummyNand {
    fn send_command(&mut self, opcode: u8) -> Result<()> {
        self.log.push(BusOp::Command(opcode));
        self.handle_command(opcode)
    }

    fn send_address(&mut self, cycles: &[u8]) -> Result<()> {
        self.log.push(BusOp::Address(cycles.to_vec()));
        self.handle_address(cycles)
    }

    fn read_data(&mut self, buf: &mut [u8]) -> Result<usize> {
        let len = match self.config.faults.short_read {
            Some(limit) => buf.len().min(limit),
            None => buf.len(),
        };
        self.log.push(BusOp::Read(len));

        match &mut self.output {
            Output::None => buf[..len].fill(0xFF),
            Output::Id(pos) => {
                for b in buf[..len].iter_mut() {
                    *b = self.config.id_bytes.get(*pos).copied().unwrap_or(0x00);
                    *pos += 1;
                }
            }
            Output::Status => buf[..len].fill(self.status),
            Output::Page { page, offset } => {
                let full = self.config.full_page();
                let stored = self.pages.get(&*page);
                for b in buf[..len].iter_mut() {
                    *b = match stored {
                        Some(data) if *offset < full => data[*offset],
                        _ => 0xFF,
                    };
                    *offset += 1;
                }
            }
        }
        Ok(len)
    }

    fn write_data(&mut self, data: &[u8]) -> Result<usize> {
        self.log.push(BusOp::Write(data.len()));
        let (_, column, register) = self.program.as_mut().ok_or_else(|| {
            log::warn!("dummy: data written outside a program sequence");
            Error::TransportError
        })?;
        let start = (*column).min(register.len());
        let len = data.len().min(register.len() - start);
        register[start..start + len].copy_from_slice(&data[..len]);
        *column += data.len();
        Ok(data.len())
    }

    fn is_ready(&mut self) -> Result<bool> {
        if self.config.faults.stuck_busy {
            return Ok(false);
        }
        if self.busy > 0 {
            self.busy -= 1;
            return Ok(false);
        }
        Ok(true)
    }

    fn delay_us(&mut self, _us: u32) {
        // No delay needed for in-memory operations
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use nandtool_core::flash::{count_mismatches, ChipOptions, NandChip, Region};
    use nandtool_core::transport::ReadyWait;

    fn pattern(len: usize, seed: u8) -> Vec<u8> {
        (0..len).map(|i| (i as u8).wrapping_mul(31) ^ seed).collect()
    }

    #[test]
    fn test_identify_large_page() {
        let mut nand = DummyNand::new_default();
        let chip = NandChip::new(&mut nand).unwrap();
        let id = chip.identity();
        assert_eq!(id.manufacturer, "Samsung");
        assert_eq!(id.page_size, 2048);
        assert_eq!(id.oob_size, 64);
        assert_eq!(id.chip_size_mb, 128);
        assert_eq!(id.address_cycles, 5);
        assert!(id.large_page);
    }

    #[test]
    fn test_large_page_read_both_scenario() {
        let mut nand = DummyNand::new_default();
        let page = pattern(2112, 0x5A);
        nand.load_page(77, &page);

        let mut chip = NandChip::new(&mut nand).unwrap();
        let mut buf = vec![0u8; 2112];
        assert_eq!(chip.read_page(77, &mut buf, Region::BOTH).unwrap(), 2112);
        drop(chip);

        assert_eq!(buf, page);
        // READ ID address plus exactly one page address
        let addresses = nand.addresses();
        assert_eq!(addresses.len(), 2);
        assert_eq!(addresses[1], &[0x00, 0x00, 77, 0x00, 0x00]);
        assert_eq!(addresses[1].len(), 5);
    }

    #[test]
    fn test_first_page_read_both_address() {
        let mut nand = DummyNand::new_default();
        let page = pattern(2112, 0xA5);
        nand.load_page(0, &page);

        let mut chip = NandChip::new(&mut nand).unwrap();
        let mut buf = vec![0u8; 2112];
        assert_eq!(chip.read_page(0, &mut buf, Region::BOTH).unwrap(), 2112);
        drop(chip);

        assert_eq!(buf, page);
        assert_eq!(nand.addresses(), vec![&[0x00][..], &[0x00, 0x00, 0x00, 0x00, 0x00][..]]);
    }

    #[test]
    fn test_decomposition_law() {
        let mut nand = DummyNand::new_default();
        nand.load_page(3, &pattern(2112, 0x11));
        let mut chip = NandChip::new(&mut nand).unwrap();

        let mut main = vec![0u8; 2048];
        let mut oob = vec![0u8; 64];
        let mut both = vec![0u8; 2112];
        chip.read_page(3, &mut main, Region::MAIN).unwrap();
        chip.read_page(3, &mut oob, Region::OOB).unwrap();
        chip.read_page(3, &mut both, Region::BOTH).unwrap();

        main.extend_from_slice(&oob);
        assert_eq!(main, both);
    }

    #[test]
    fn test_small_page_oob_read() {
        let mut nand = DummyNand::new(DummyConfig::small_page());
        let page = pattern(528, 0x42);
        nand.load_page(5, &page);

        let mut chip = NandChip::new(&mut nand).unwrap();
        assert!(!chip.identity().large_page);
        let mut oob = [0u8; 16];
        assert_eq!(chip.read_page(5, &mut oob, Region::OOB).unwrap(), 16);
        drop(chip);

        assert_eq!(&oob[..], &page[512..]);
        let log = nand.log();
        let n = log.len();
        assert_eq!(
            &log[n - 3..],
            &[
                BusOp::Command(0x50),
                BusOp::Address(vec![0x00, 0x05, 0x00]),
                BusOp::Read(16),
            ]
        );
    }

    #[test]
    fn test_small_page_main_read() {
        let mut nand = DummyNand::new(DummyConfig::small_page());
        let page = pattern(528, 0x07);
        nand.load_page(1000, &page);

        let mut chip = NandChip::new(&mut nand).unwrap();
        let mut buf = vec![0u8; 528];
        assert_eq!(chip.read_page(1000, &mut buf, Region::BOTH).unwrap(), 528);
        assert_eq!(buf, page);

        let mut main = vec![0u8; 512];
        assert_eq!(chip.read_page(1000, &mut main, Region::MAIN).unwrap(), 512);
        assert_eq!(&main[..], &page[..512]);
    }

    #[test]
    fn test_write_then_read_back() {
        for config in [DummyConfig::default(), DummyConfig::small_page()] {
            let full = (config.page_size + config.oob_size) as usize;
            let mut nand = DummyNand::new(config);
            let data = pattern(full, 0xC3);

            let mut chip = NandChip::new(&mut nand).unwrap();
            assert_eq!(chip.write_page(12, &data, Region::BOTH).unwrap(), full);

            let mut buf = vec![0u8; full];
            chip.read_page(12, &mut buf, Region::BOTH).unwrap();
            assert_eq!(buf, data);
            drop(chip);

            assert_eq!(nand.page(12), data);
        }
    }

    #[test]
    fn test_program_only_clears_bits() {
        let mut nand = DummyNand::new_default();
        nand.load_page(0, &vec![0x0F; 2112]);
        let mut chip = NandChip::new(&mut nand).unwrap();
        chip.write_page(0, &vec![0xF3; 2112], Region::BOTH).unwrap();
        drop(chip);
        assert!(nand.page(0).iter().all(|&b| b == 0x03));
    }

    #[test]
    fn test_partial_write_is_rejected_without_io() {
        let mut nand = DummyNand::new_default();
        let mut chip = NandChip::new(&mut nand).unwrap();
        for region in [Region::MAIN, Region::OOB] {
            assert_eq!(
                chip.write_page(0, &[0u8; 2112], region),
                Err(Error::PartialProgramUnsupported)
            );
        }
        drop(chip);

        // Only the identification sequence reached the bus
        assert_eq!(
            nand.log(),
            &[
                BusOp::Command(0xFF),
                BusOp::Command(0x90),
                BusOp::Address(vec![0x00]),
                BusOp::Read(8),
            ]
        );
    }

    #[test]
    fn test_program_failure() {
        let mut nand = DummyNand::new_default();
        nand.faults_mut().fail_program.push(9);
        let mut chip = NandChip::new(&mut nand).unwrap();

        assert!(chip.write_page(8, &[0u8; 2112], Region::BOTH).is_ok());
        match chip.write_page(9, &[0u8; 2112], Region::BOTH) {
            Err(Error::ProgramFailed { page, status }) => {
                assert_eq!(page, 9);
                assert_ne!(status & 0x01, 0);
            }
            other => panic!("unexpected result {:?}", other),
        }
        drop(chip);
        assert_eq!(nand.page(9), vec![0xFF; 2112]);
    }

    #[test]
    fn test_short_read_surfaces() {
        let mut nand = DummyNand::new_default();
        nand.faults_mut().short_read = Some(100);
        let mut chip = NandChip::new(&mut nand).unwrap();

        let mut buf = vec![0u8; 2112];
        assert_eq!(
            chip.read_page(0, &mut buf, Region::BOTH),
            Err(Error::ShortTransfer {
                requested: 2112,
                actual: 100
            })
        );
    }

    #[test]
    fn test_stuck_busy_times_out() {
        let mut nand = DummyNand::new_default();
        nand.faults_mut().stuck_busy = true;
        let options = ChipOptions {
            ready: ReadyWait::with_timeout_us(1_000),
            ..ChipOptions::default()
        };
        let mut chip = NandChip::with_options(&mut nand, options).unwrap();
        let mut buf = vec![0u8; 2112];
        assert_eq!(
            chip.read_page(0, &mut buf, Region::BOTH),
            Err(Error::Timeout)
        );
    }

    #[test]
    fn test_verify_property() {
        let mut nand = DummyNand::new_default();
        let image = pattern(2112, 0x99);
        nand.load_page(0, &image);
        let mut chip = NandChip::new(&mut nand).unwrap();

        let mut main = vec![0u8; 2048];
        let mut oob = vec![0u8; 64];
        chip.read_page(0, &mut main, Region::MAIN).unwrap();
        chip.read_page(0, &mut oob, Region::OOB).unwrap();
        assert_eq!(count_mismatches(&image[..2048], &main), 0);
        assert_eq!(count_mismatches(&image[2048..], &oob), 0);

        let mut flipped = image.clone();
        flipped[2048 + 5] ^= 0x80;
        assert_eq!(count_mismatches(&flipped[..2048], &main), 0);
        assert_eq!(count_mismatches(&flipped[2048..], &oob), 1);
    }

    #[test]
    fn test_unknown_chip() {
        let mut config = DummyConfig::default();
        config.id_bytes[1] = 0x00;
        let mut nand = DummyNand::new(config);
        let mut chip = NandChip::new(&mut nand).unwrap();
        assert!(!chip.identity().is_identified());
        let mut buf = [0u8; 64];
        assert_eq!(
            chip.read_page(0, &mut buf, Region::OOB),
            Err(Error::DeviceNotIdentified)
        );
    }

    #[test]
    fn test_wrong_cycle_count_is_caught() {
        let mut nand = DummyNand::new_default();
        nand.send_command(opcodes::READ0).unwrap();
        assert_eq!(
            nand.send_address(&[0, 0, 0, 0]),
            Err(Error::TransportError)
        );
    }

    #[test]
    fn test_small_page_config_matches_table() {
        let config = DummyConfig::small_page();
        let table = DummyConfig::from_id(0xEC, 0x75).unwrap();
        assert_eq!(config.page_size, table.page_size);
        assert_eq!(config.oob_size, table.oob_size);
        assert_eq!(config.chip_size_mb, table.chip_size_mb);
        assert_eq!(config.address_cycles, table.address_cycles);
        assert!(!config.large_page);
        assert_eq!(config.busy_polls, DummyConfig::default().busy_polls);
        assert!(config.faults.fail_program.is_empty());
    }

    #[test]
    fn test_parse_options() {
        let config = parse_options(&[]).unwrap();
        assert_eq!(config.id_bytes[..2], [0xEC, 0xF1]);

        let config = parse_options(&[("id", "EC75"), ("busy", "3")]).unwrap();
        assert_eq!(config.page_size, 512);
        assert_eq!(config.address_cycles, 3);
        assert_eq!(config.busy_polls, 3);

        assert!(parse_options(&[("id", "4242")]).is_err());
        assert!(parse_options(&[("id", "zz")]).is_err());
        assert!(parse_options(&[("speed", "1")]).is_err());
    }
}
