//! FTDI MCU host-bus emulation protocol
//!
//! In MCU host-bus mode the FT2232H drives an 8-bit multiplexed bus with
//! read/write strobes. The NAND data lines sit on AD0-AD7, and the control
//! lines CLE, ALE and WP# are wired to upper address lines A13-A15, so every
//! bus cycle selects the kind of NAND cycle through its high address byte.
//! R/B# is sampled on the I/O pins of the high byte.
//!
//! The functions here only build command buffers; they never touch USB.

// ============================================================================
// USB VID/PID constants
// ============================================================================

/// FTDI vendor ID
pub const FTDI_VID: u16 = 0x0403;

/// FT2232H product ID (dual channel)
pub const FTDI_FT2232H_PID: u16 = 0x6010;

// ============================================================================
// MCU host-bus commands
// ============================================================================

/// Read one byte, 16-bit address
pub const READ_EXTENDED: u8 = 0x91;

/// Write one byte, 16-bit address
pub const WRITE_EXTENDED: u8 = 0x93;

/// Read the high byte I/O pins
pub const GET_BITS_HIGH: u8 = 0x83;

/// Flush the read buffer to the host now
pub const SEND_IMMEDIATE: u8 = 0x87;

/// Disable the divide-by-5 prescaler (60 MHz master clock)
pub const DIS_DIV_5: u8 = 0x8A;

/// Enable the divide-by-5 prescaler (12 MHz master clock)
pub const EN_DIV_5: u8 = 0x8B;

// ============================================================================
// NAND control lines on the high address byte
// ============================================================================

/// WP# (high = writes allowed)
pub const ADR_WP: u8 = 0x20;

/// CLE
pub const ADR_CL: u8 = 0x40;

/// ALE
pub const ADR_AL: u8 = 0x80;

/// R/B# bit in the GET_BITS_HIGH response (high = ready)
pub const RB_READY: u8 = 0x02;

// ============================================================================
// Transfer limits
// ============================================================================

/// FTDI hardware buffer size
pub const FTDI_HW_BUFFER_SIZE: usize = 4096;

/// Command bytes per bus write cycle
pub const WRITE_CYCLE_LEN: usize = 4;

/// Command bytes per bus read cycle
pub const READ_CYCLE_LEN: usize = 3;

/// Data bytes moved per USB round trip
///
/// A write chunk expands to `WRITE_CYCLE_LEN` command bytes per data byte,
/// which must still fit the hardware buffer.
pub const MAX_CHUNK: usize = FTDI_HW_BUFFER_SIZE / WRITE_CYCLE_LEN;

/// Kind of NAND bus cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusCycle {
    /// Command latch (CLE high)
    Command,
    /// Address latch (ALE high)
    Address,
    /// Plain data cycle
    Data,
}

impl BusCycle {
    /// High address byte selecting this cycle kind
    ///
    /// WP# is held released on every cycle.
    pub fn high_address(self) -> u8 {
        match self {
            BusCycle::Command => ADR_WP | ADR_CL,
            BusCycle::Address => ADR_WP | ADR_AL,
            BusCycle::Data => ADR_WP,
        }
    }
}

/// Append one write strobe per byte of `data`
pub fn push_write_cycles(buf: &mut Vec<u8>, cycle: BusCycle, data: &[u8]) {
    let high = cycle.high_address();
    buf.reserve(data.len() * WRITE_CYCLE_LEN);
    for &byte in data {
        buf.extend_from_slice(&[WRITE_EXTENDED, high, 0x00, byte]);
    }
}

/// Append `count` data read strobes followed by a flush
pub fn push_read_cycles(buf: &mut Vec<u8>, count: usize) {
    let high = BusCycle::Data.high_address();
    buf.reserve(count * READ_CYCLE_LEN + 1);
    for _ in 0..count {
        buf.extend_from_slice(&[READ_EXTENDED, high, 0x00]);
    }
    buf.push(SEND_IMMEDIATE);
}

/// Command sampling the ready/busy line (one response byte)
pub fn ready_probe() -> [u8; 2] {
    [GET_BITS_HIGH, SEND_IMMEDIATE]
}

/// Whether a GET_BITS_HIGH response reports ready
pub fn is_ready(response: u8) -> bool {
    response & RB_READY != 0
}

/// Clock prescaler command
pub fn clock_setup(slow: bool) -> u8 {
    if slow {
        EN_DIV_5
    } else {
        DIS_DIV_5
    }
}

/// FTDI interface/channel selection
///
/// The FT2232H only offers host-bus emulation on its two full channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FtdiInterface {
    /// Channel A (default)
    #[default]
    A,
    /// Channel B
    B,
}

impl FtdiInterface {
    /// Parse interface from character
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(FtdiInterface::A),
            'B' => Some(FtdiInterface::B),
            _ => None,
        }
    }

    /// Get the channel letter
    pub fn letter(&self) -> char {
        match self {
            FtdiInterface::A => 'A',
            FtdiInterface::B => 'B',
        }
    }
}
