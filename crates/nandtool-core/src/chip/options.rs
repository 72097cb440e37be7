//! Geometry option flags

use bitflags::bitflags;

bitflags! {
    /// Option flags for a NAND geometry entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GeometryOptions: u32 {
        /// Page is larger than 512 bytes; reads need READSTART (0x30)
        const LARGE_PAGE  = 1 << 0;
        /// Chip has a 16-bit data bus
        const BUSWIDTH_16 = 1 << 1;
    }
}

impl Default for GeometryOptions {
    fn default() -> Self {
        GeometryOptions::empty()
    }
}
