//! Page region selector

use bitflags::bitflags;
use core::fmt;

bitflags! {
    /// Part of a page an operation covers
    ///
    /// `BOTH` lays out main bytes followed by spare bytes. The empty value
    /// is rejected by every operation.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Region: u8 {
        /// Main (user data) area
        const MAIN = 1 << 0;
        /// Out-of-band (spare) area
        const OOB  = 1 << 1;
        /// Main area followed by spare area
        const BOTH = Self::MAIN.bits() | Self::OOB.bits();
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Region::MAIN => write!(f, "main"),
            Region::OOB => write!(f, "oob"),
            Region::BOTH => write!(f, "both"),
            _ => write!(f, "none"),
        }
    }
}
