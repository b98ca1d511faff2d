//! Crowd seat placement files.
//!
//! Stadium crowds are stored as a `CRWD` header followed by fixed-size seat
//! records. The seat layout changed between game generations:
//!
//! | Version | Seat size | Used by            |
//! |---------|-----------|--------------------|
//! | `0x103` | 42 bytes  | FIFA 07 - FIFA 14  |
//! | `0x104` | 41 bytes  | World Cup 2014     |
//! | `0x105` | 32 bytes  | FIFA 15 and later  |
//!
//! Files decode into a [`CrowdFile`] and encode back to identical bytes.

mod error;
mod file;
mod header;
mod seat;

pub use error::{Error, Result};
pub use file::{CrowdFile, CrowdSeats};
pub use header::{CrowdHeader, CrowdVersion, RawCrowdHeader};
pub use seat::{Seat0103, Seat0104, Seat0105, Vector3};
