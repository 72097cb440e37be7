//! NAND command set and bus-level encodings
//!
//! This module provides the standard parallel NAND opcodes, the address
//! cycle encoder and the status register decoding.

mod address;
pub mod opcodes;
mod status;

pub use address::{AddressCycles, MAX_ADDRESS_CYCLES};
pub use status::Status;
