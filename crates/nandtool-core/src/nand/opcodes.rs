//! Standard parallel NAND opcodes
//!
//! Small-page (512 byte) devices select the area to read with a pointer
//! command (READ0/READ1/READOOB). Large-page devices use a two-cycle read
//! (READ0 + READSTART) over one contiguous main+spare page buffer.

// ============================================================================
// Reset and identification
// ============================================================================

/// Reset - aborts any operation and returns the chip to idle
pub const RESET: u8 = 0xFF;
/// Read ID - followed by one address cycle (0x00)
pub const READID: u8 = 0x90;
/// Read Status register
pub const STATUS: u8 = 0x70;

// ============================================================================
// Read
// ============================================================================

/// Read mode 0: first half of the main area (small page), or read setup
/// (large page)
pub const READ0: u8 = 0x00;
/// Read mode 1: second half of the main area (small page only)
pub const READ1: u8 = 0x01;
/// Read spare area (small page only)
pub const READOOB: u8 = 0x50;
/// Read confirm (large page only)
pub const READSTART: u8 = 0x30;

// ============================================================================
// Program
// ============================================================================

/// Serial data input - program setup
pub const SEQIN: u8 = 0x80;
/// Page program confirm
pub const PAGEPROG: u8 = 0x10;

// ============================================================================
// Reset timing
// ============================================================================

/// Settle delay after RESET before the chip accepts further commands
pub const RESET_DELAY_US: u32 = 10_000;

/// Size of the main-area half addressed by READ0/READ1 on small-page chips
pub const SMALL_PAGE_HALF: u32 = 256;
