//! Chip controller and page-level operations
//!
//! [`NandChip`] identifies the chip once, picks the page access strategy
//! for it and then serves page reads and writes for the main area, the
//! spare area or both.

mod chip;
mod region;
mod verify;

pub use crate::chip::ChipOptions;
pub use chip::NandChip;
pub use region::Region;
pub use verify::{count_mismatches, mismatches, Mismatch};
