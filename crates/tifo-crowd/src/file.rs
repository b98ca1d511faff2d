//! Crowd file reading and writing.

use std::path::Path;

use tifo_common::{BinaryReader, BinaryWriter, FromBytes, Immutable, IntoBytes, KnownLayout};
use tracing::{debug, warn};

use crate::header::{CrowdHeader, CrowdVersion, RawCrowdHeader};
use crate::seat::{Seat0103, Seat0104, Seat0105};
use crate::Result;

/// Seats of one layout version.
///
/// Keeping one vector per version makes mixed layouts unrepresentable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CrowdSeats {
    V0103(Vec<Seat0103>),
    V0104(Vec<Seat0104>),
    V0105(Vec<Seat0105>),
    /// Seats of an unknown version are not decoded.
    Unknown(u16),
}

impl CrowdSeats {
    /// An empty seat list for `version`.
    pub fn empty(version: CrowdVersion) -> Self {
        match version {
            CrowdVersion::V0103 => Self::V0103(Vec::new()),
            CrowdVersion::V0104 => Self::V0104(Vec::new()),
            CrowdVersion::V0105 => Self::V0105(Vec::new()),
            CrowdVersion::Unknown(raw) => Self::Unknown(raw),
        }
    }

    pub fn version(&self) -> CrowdVersion {
        match self {
            Self::V0103(_) => CrowdVersion::V0103,
            Self::V0104(_) => CrowdVersion::V0104,
            Self::V0105(_) => CrowdVersion::V0105,
            Self::Unknown(raw) => CrowdVersion::Unknown(*raw),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::V0103(seats) => seats.len(),
            Self::V0104(seats) => seats.len(),
            Self::V0105(seats) => seats.len(),
            Self::Unknown(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A crowd seat placement file.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CrowdFile {
    /// Header as read. [`CrowdFile::to_bytes`] derives both fields from
    /// `seats` instead.
    pub header: CrowdHeader,
    pub seats: CrowdSeats,
}

impl CrowdFile {
    /// Create an empty file for `version`.
    pub fn new(version: CrowdVersion) -> Self {
        Self {
            header: CrowdHeader {
                version,
                num_seats: 0,
            },
            seats: CrowdSeats::empty(version),
        }
    }

    /// Load a crowd file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::parse(&data)
    }

    /// Decode a crowd file from a buffer.
    ///
    /// # Errors
    ///
    /// Fails if the magic is not `CRWD` or if the buffer holds fewer seats
    /// than the header declares. An unknown version is not an error; the
    /// seats are left undecoded.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let header = CrowdHeader::read(&mut reader)?;
        let count = header.num_seats as usize;

        let seats = match header.version {
            CrowdVersion::V0103 => CrowdSeats::V0103(read_seats(&mut reader, count)?),
            CrowdVersion::V0104 => CrowdSeats::V0104(read_seats(&mut reader, count)?),
            CrowdVersion::V0105 => CrowdSeats::V0105(read_seats(&mut reader, count)?),
            CrowdVersion::Unknown(raw) => {
                warn!(version = raw, num_seats = header.num_seats, "unknown crowd version");
                CrowdSeats::Unknown(raw)
            }
        };

        debug!(version = %header.version, seats = seats.len(), "decoded crowd file");
        Ok(Self { header, seats })
    }

    /// Encode the file.
    ///
    /// The header version and seat count are taken from `seats`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let header = CrowdHeader {
            version: self.seats.version(),
            num_seats: self.seats.len() as u32,
        };
        let seat_size = header.version.seat_size().unwrap_or(0);
        let mut writer = BinaryWriter::with_capacity(RawCrowdHeader::SIZE + seat_size * self.seats.len());
        header.write(&mut writer)?;

        match &self.seats {
            CrowdSeats::V0103(seats) => write_seats(&mut writer, seats)?,
            CrowdSeats::V0104(seats) => write_seats(&mut writer, seats)?,
            CrowdSeats::V0105(seats) => write_seats(&mut writer, seats)?,
            CrowdSeats::Unknown(_) => {}
        }

        Ok(writer.into_inner())
    }

    /// Encode the file and write it to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn version(&self) -> CrowdVersion {
        self.seats.version()
    }

    pub fn num_seats(&self) -> usize {
        self.seats.len()
    }
}

fn read_seats<T: FromBytes>(reader: &mut BinaryReader<'_>, count: usize) -> Result<Vec<T>> {
    let mut seats = Vec::with_capacity(reader.capacity_hint(count));
    for _ in 0..count {
        seats.push(reader.read_struct()?);
    }
    Ok(seats)
}

fn write_seats<T: IntoBytes + Immutable + KnownLayout>(writer: &mut BinaryWriter, seats: &[T]) -> Result<()> {
    for seat in seats {
        writer.write_bytes(seat.as_bytes())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::seat::Vector3;

    fn seat0103() -> Seat0103 {
        Seat0103 {
            position: Vector3::new(-12.5, 3.0, 40.25),
            rotation: 1.5,
            seat_color: [200, 16, 46],
            section: 4,
            tier: 2,
            attendance: 90,
            influence_area: 1,
            unused: 0xCD,
            shade: [0.25, 0.5, 0.75, 1.0],
            anim_groups: 3,
            num_accessories: 1,
        }
    }

    fn v0103_bytes() -> Vec<u8> {
        let mut data = b"CRWD".to_vec();
        data.extend_from_slice(&0x103u16.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(seat0103().as_bytes());
        data
    }

    #[test]
    fn test_v0103_roundtrip_is_exact() {
        let data = v0103_bytes();
        assert_eq!(data.len(), 10 + 42);

        let file = CrowdFile::parse(&data).unwrap();
        assert_eq!(file.header.version, CrowdVersion::V0103);
        assert_eq!(file.num_seats(), 1);
        match &file.seats {
            CrowdSeats::V0103(seats) => assert_eq!(seats[0], seat0103()),
            other => panic!("unexpected seats: {other:?}"),
        }

        assert_eq!(file.to_bytes().unwrap(), data);
    }

    #[test]
    fn test_seat_count_follows_seats() {
        let mut file = CrowdFile::new(CrowdVersion::V0105);
        if let CrowdSeats::V0105(seats) = &mut file.seats {
            seats.push(Seat0105::default());
            seats.push(Seat0105::default());
        }

        let data = file.to_bytes().unwrap();
        assert_eq!(data.len(), 10 + 2 * 32);
        assert_eq!(&data[6..10], &2u32.to_le_bytes());

        let decoded = CrowdFile::parse(&data).unwrap();
        assert_eq!(decoded.header.num_seats, 2);
        assert_eq!(decoded.seats, file.seats);
    }

    #[test]
    fn test_v0104_seats() {
        let mut data = b"CRWD\x04\x01\x01\x00\x00\x00".to_vec();
        let mut seat = [0u8; 41];
        seat[19] = 7;
        seat[24] = 55;
        data.extend_from_slice(&seat);

        let file = CrowdFile::parse(&data).unwrap();
        let CrowdSeats::V0104(seats) = &file.seats else {
            panic!("expected v0104 seats");
        };
        assert_eq!(seats[0].section_0, 7);
        assert_eq!(seats[0].attendance, 55);
        assert_eq!(file.to_bytes().unwrap(), data);
    }

    #[test]
    fn test_unknown_version_has_no_seats() {
        let mut data = b"CRWD\x00\x02\x05\x00\x00\x00".to_vec();
        data.extend_from_slice(&[0xFF; 64]);

        let file = CrowdFile::parse(&data).unwrap();
        assert_eq!(file.version(), CrowdVersion::Unknown(0x200));
        assert_eq!(file.header.num_seats, 5);
        assert!(file.seats.is_empty());

        assert_eq!(file.to_bytes().unwrap(), b"CRWD\x00\x02\x00\x00\x00\x00");
    }

    #[test]
    fn test_missing_seats_are_truncated() {
        let data = v0103_bytes();
        let err = CrowdFile::parse(&data[..data.len() - 1]).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crowd.dat");
        std::fs::write(&path, v0103_bytes()).unwrap();

        let file = CrowdFile::load(&path).unwrap();
        let out = dir.path().join("copy.dat");
        file.save(&out).unwrap();

        assert_eq!(std::fs::read(out).unwrap(), v0103_bytes());
    }
}
