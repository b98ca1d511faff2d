//! Common utilities for Tifo.
//!
//! This crate provides the low-level pieces every container decoder builds on:
//!
//! - [`BinaryReader`] - Bounds-checked little-endian cursor over a byte slice
//! - [`PositionGuard`] - Scoped save/restore of the cursor position
//! - [`BinaryWriter`] - Little-endian writer with alignment and size back-patching
//! - [`OffsetTable`] - Resolution of `(count, table offset)` pointer arrays
//! - [`util`] - Latin-1 text, alignment and count helpers

mod error;
mod offset_table;
mod reader;
mod writer;

pub mod util;

pub use error::{Error, Result};
pub use offset_table::{resolve_offset_table, OffsetBase, OffsetTable};
pub use reader::{BinaryReader, PositionGuard, SIZED_STRING_LEN};
pub use writer::{BinaryWriter, SECTION_ALIGNMENT};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
