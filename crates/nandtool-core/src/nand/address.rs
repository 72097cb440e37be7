//! Address cycle encoding
//!
//! A NAND address is sent as a fixed number of byte-wide cycles: first the
//! column (byte offset within the page), then the row (page number), both
//! least significant byte first. The number of cycles is a property of the
//! chip and must be matched exactly, otherwise the chip treats the next
//! command byte as an address byte.

use crate::error::{Error, Result};

/// Maximum number of address cycles any supported chip uses
pub const MAX_ADDRESS_CYCLES: usize = 5;

/// An encoded address sequence, ready to be latched into the chip
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressCycles {
    bytes: [u8; MAX_ADDRESS_CYCLES],
    len: u8,
}

impl AddressCycles {
    /// A single address cycle (used by READ ID)
    pub const fn single(byte: u8) -> Self {
        Self {
            bytes: [byte, 0, 0, 0, 0],
            len: 1,
        }
    }

    /// Encode a column and page number
    ///
    /// `column_cycles` is 1 for small-page chips and 2 for large-page chips;
    /// the remaining `total_cycles - column_cycles` cycles carry the page
    /// number.
    pub fn encode(column: u16, page: u32, column_cycles: u8, total_cycles: u8) -> Result<Self> {
        if column_cycles == 0
            || column_cycles > 2
            || total_cycles as usize > MAX_ADDRESS_CYCLES
            || total_cycles <= column_cycles
        {
            return Err(Error::InvalidGeometry);
        }

        if column_cycles == 1 && column > 0xFF {
            return Err(Error::AddressOutOfBounds);
        }

        let row_cycles = total_cycles - column_cycles;
        if row_cycles < 4 && page >> (8 * row_cycles as u32) != 0 {
            return Err(Error::AddressOutOfBounds);
        }

        let mut bytes = [0u8; MAX_ADDRESS_CYCLES];
        let mut i = 0;
        for shift in 0..column_cycles {
            bytes[i] = (column >> (8 * shift as u16)) as u8;
            i += 1;
        }
        for shift in 0..row_cycles {
            bytes[i] = if shift < 4 {
                (page >> (8 * shift as u32)) as u8
            } else {
                0
            };
            i += 1;
        }

        Ok(Self {
            bytes,
            len: total_cycles,
        })
    }

    /// The address bytes in the order they go on the bus
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// Number of address cycles
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True if there are no address cycles
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
