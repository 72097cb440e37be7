//! Protocol implementations
//!
//! This module contains the parallel NAND command sequences used by
//! identification and page access.

mod nand;

pub use nand::*;
