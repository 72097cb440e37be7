//! Error types for nandtool-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate. Every failure a page operation can hit is a
//! distinct variant so a caller looping over pages can decide per page
//! whether to abort, skip or report.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Identification errors
    /// Page access attempted on a chip whose geometry is unknown
    DeviceNotIdentified,
    /// Geometry entry is inconsistent (e.g. too few address cycles)
    InvalidGeometry,

    // Usage errors
    /// Region selector is empty
    InvalidRegion,
    /// Programming only the main or only the OOB area was requested
    PartialProgramUnsupported,
    /// Provided buffer is too small for the operation
    BufferTooSmall,
    /// Page number does not fit in the chip's row address cycles
    AddressOutOfBounds,

    // Transfer errors
    /// Transport moved fewer bytes than requested
    ShortTransfer {
        /// Number of bytes requested
        requested: usize,
        /// Number of bytes actually transferred
        actual: usize,
    },
    /// Chip did not become ready within the configured timeout
    Timeout,
    /// Transport-level failure (USB error, link closed, ...)
    TransportError,

    // Operation errors
    /// Status register reported a failed page program
    ProgramFailed {
        /// Page that failed to program
        page: u32,
        /// Raw status byte read after the program operation
        status: u8,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceNotIdentified => write!(f, "NAND device not identified"),
            Self::InvalidGeometry => write!(f, "invalid NAND geometry"),
            Self::InvalidRegion => write!(f, "empty region selector"),
            Self::PartialProgramUnsupported => {
                write!(f, "writing only main or only OOB data is not supported")
            }
            Self::BufferTooSmall => write!(f, "buffer too small"),
            Self::AddressOutOfBounds => write!(f, "page address out of bounds"),
            Self::ShortTransfer { requested, actual } => write!(
                f,
                "short transfer: requested {} bytes, transferred {}",
                requested, actual
            ),
            Self::Timeout => write!(f, "timed out waiting for NAND ready"),
            Self::TransportError => write!(f, "transport error"),
            Self::ProgramFailed { page, status } => write!(
                f,
                "program failed on page {} (status 0x{:02X})",
                page, status
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
