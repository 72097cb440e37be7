//! nandtool-ftdi - FTDI FT2232H NAND transport
//!
//! This crate drives a parallel NAND chip from an FT2232H running in MCU
//! host-bus emulation mode. Data lines go to AD0-AD7, CLE/ALE/WP# to the
//! upper address lines and R/B# to a high-byte I/O pin.
//!
//! # Example
//!
//! ```no_run
//! use nandtool_ftdi::{FtdiNand, FtdiNandConfig, FtdiInterface};
//! use nandtool_core::flash::NandChip;
//!
//! let config = FtdiNandConfig::default()
//!     .interface(FtdiInterface::A)
//!     .slow_clock(true);
//! let mut ftdi = FtdiNand::open(&config)?;
//!
//! let chip = NandChip::new(&mut ftdi)?;
//! println!("{}", chip.identity());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Programmer Options
//!
//! When using the CLI, the following options are available:
//!
//! - `vid=<hex>` / `pid=<hex>` - USB IDs (default: 0403:6010)
//! - `usb=<vid>:<pid>` - Both USB IDs at once
//! - `port=<A|B>` - Channel to use (default: A)
//! - `slow=<0|1>` - Use the 12 MHz clock instead of 60 MHz

#[cfg(feature = "std")]
mod device;
pub mod error;
pub mod protocol;

#[cfg(feature = "std")]
pub use device::{parse_options, FtdiNand, FtdiNandConfig, TRANSPORT_INFO};
pub use error::{FtdiNandError, Result};
pub use protocol::FtdiInterface;
