//! Transport traits and abstractions
//!
//! This module defines the trait a physical link must implement to drive a
//! NAND chip's command/address/data bus.

mod traits;

pub use traits::*;
