//! nandtool-core - Core library for raw parallel NAND flash access
//!
//! This crate identifies a NAND die over a command/address/data interface
//! and provides geometry-correct access to the main and out-of-band (spare)
//! areas of each page. It is `no_std` compatible (it needs `alloc`).
//!
//! # Features
//!
//! - `std` - Enable standard library support: `std::error::Error` impls and
//!   the runtime geometry database loaded from RON files
//!
//! # Example
//!
//! ```ignore
//! use nandtool_core::flash::{NandChip, Region};
//! use nandtool_core::transport::NandTransport;
//!
//! fn dump_first_page<T: NandTransport>(transport: &mut T) -> nandtool_core::Result<()> {
//!     let mut chip = NandChip::new(transport)?;
//!     println!("Found: {}", chip.identity());
//!
//!     let mut buf = vec![0u8; chip.region_size(Region::BOTH)];
//!     let n = chip.read_page(0, &mut buf, Region::BOTH)?;
//!     println!("Read {} bytes", n);
//!     Ok(())
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod access;
pub mod chip;
pub mod error;
pub mod flash;
pub mod nand;
pub mod protocol;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Error, Result};
