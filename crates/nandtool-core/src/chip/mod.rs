//! NAND chip geometry table and identification
//!
//! This module provides the static table of known NAND dies, the
//! manufacturer name table and the resolver that turns the bytes returned by
//! READ ID into a [`ResolvedIdentity`].

mod identity;
mod options;
mod table;
mod types;

#[cfg(feature = "std")]
mod database;

pub use identity::*;
pub use options::GeometryOptions;
pub use table::{lookup, manufacturer_name, GEOMETRY_TABLE, MANUFACTURERS};
pub use types::*;

#[cfg(feature = "std")]
pub use database::*;
