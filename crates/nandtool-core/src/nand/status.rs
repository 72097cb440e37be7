//! NAND status register decoding

use bitflags::bitflags;

bitflags! {
    /// NAND status register (returned by the STATUS command)
    ///
    /// | Bit | Description            | Value                      |
    /// | --- | ---------------------- | -------------------------- |
    /// | 0   | Program/erase result   | Pass: 0, Fail: 1           |
    /// | 1   | Cache program result   | Pass: 0, Fail: 1           |
    /// | 5   | Array ready            | Ready: 1, Busy: 0          |
    /// | 6   | I/O ready              | Ready: 1, Busy: 0          |
    /// | 7   | Write protect          | Not protected: 1           |
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Last program/erase operation failed
        const FAIL = 1 << 0;
        /// Previous cache program operation failed
        const FAIL_CACHE = 1 << 1;
        /// Internal array operation finished
        const ARRAY_READY = 1 << 5;
        /// Chip ready for the next command
        const READY = 1 << 6;
        /// Write protect deasserted
        const WRITE_ENABLED = 1 << 7;
    }
}

impl Status {
    /// Decode a raw status byte, keeping undefined bits out
    pub fn from_raw(raw: u8) -> Self {
        Self::from_bits_truncate(raw)
    }

    /// Check if the last program operation failed
    pub fn is_failed(&self) -> bool {
        self.contains(Status::FAIL)
    }

    /// Check if the chip is ready
    pub fn is_ready(&self) -> bool {
        self.contains(Status::READY)
    }

    /// Check if the chip is write protected
    pub fn is_write_protected(&self) -> bool {
        !self.contains(Status::WRITE_ENABLED)
    }
}
