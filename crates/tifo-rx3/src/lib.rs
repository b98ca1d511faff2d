//! RX3 model container sections.
//!
//! Currently covers the bone name section, which is kept as an opaque
//! payload and re-encoded byte for byte.

mod bone_name;
mod error;

pub use bone_name::{BoneName, RawSectionHeader};
pub use error::{Error, Result};
