//! Crowd file header.

use std::fmt;

use tifo_common::{BinaryReader, BinaryWriter};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::Result;

/// On-disk crowd file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct RawCrowdHeader {
    /// Magic bytes (`CRWD`).
    pub magic: [u8; 4],
    /// Seat layout version.
    pub version: u16,
    /// Number of seat records that follow.
    pub num_seats: u32,
}

impl RawCrowdHeader {
    /// Expected magic.
    pub const MAGIC: [u8; 4] = *b"CRWD";

    /// Header size in bytes.
    pub const SIZE: usize = 10;
}

const _: () = assert!(std::mem::size_of::<RawCrowdHeader>() == RawCrowdHeader::SIZE);

/// Seat layout version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CrowdVersion {
    /// `0x103`: FIFA 07 to FIFA 14.
    V0103,
    /// `0x104`: World Cup 2014.
    V0104,
    /// `0x105`: FIFA 15 and later.
    V0105,
    /// Any other version; seats cannot be decoded.
    Unknown(u16),
}

impl CrowdVersion {
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0x103 => Self::V0103,
            0x104 => Self::V0104,
            0x105 => Self::V0105,
            other => Self::Unknown(other),
        }
    }

    pub fn to_raw(self) -> u16 {
        match self {
            Self::V0103 => 0x103,
            Self::V0104 => 0x104,
            Self::V0105 => 0x105,
            Self::Unknown(raw) => raw,
        }
    }

    /// Size of one seat record, if the version is known.
    pub fn seat_size(self) -> Option<usize> {
        match self {
            Self::V0103 => Some(42),
            Self::V0104 => Some(41),
            Self::V0105 => Some(32),
            Self::Unknown(_) => None,
        }
    }
}

impl fmt::Display for CrowdVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.to_raw())
    }
}

/// Decoded crowd file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CrowdHeader {
    pub version: CrowdVersion,
    pub num_seats: u32,
}

impl CrowdHeader {
    /// Read and validate the header at the current position.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        reader.expect_magic(&RawCrowdHeader::MAGIC)?;
        let version = CrowdVersion::from_raw(reader.read_u16()?);
        let num_seats = reader.read_u32()?;
        Ok(Self { version, num_seats })
    }

    pub fn write(&self, writer: &mut BinaryWriter) -> Result<()> {
        let raw = RawCrowdHeader {
            magic: RawCrowdHeader::MAGIC,
            version: self.version.to_raw(),
            num_seats: self.num_seats,
        };
        writer.write_bytes(raw.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = CrowdHeader {
            version: CrowdVersion::V0104,
            num_seats: 3,
        };
        let mut writer = BinaryWriter::new();
        header.write(&mut writer).unwrap();

        assert_eq!(writer.as_slice(), b"CRWD\x04\x01\x03\x00\x00\x00");

        let data = writer.into_inner();
        let mut reader = BinaryReader::new(&data);
        assert_eq!(CrowdHeader::read(&mut reader).unwrap(), header);
        assert_eq!(reader.position(), RawCrowdHeader::SIZE);
    }

    #[test]
    fn test_bad_magic() {
        let mut reader = BinaryReader::new(b"CRWX\x03\x01\x00\x00\x00\x00");
        let err = CrowdHeader::read(&mut reader).unwrap_err();
        assert!(err.is_malformed_header());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(CrowdVersion::V0105.to_string(), "0x0105");
        assert_eq!(CrowdVersion::from_raw(0x200), CrowdVersion::Unknown(0x200));
        assert_eq!(CrowdVersion::Unknown(0x200).seat_size(), None);
    }
}
