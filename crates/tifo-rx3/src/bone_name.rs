//! Bone name section.
//!
//! ```text
//! 0x00  totalSize:u32  unknown1:u32  unknown2:u32  unknown3:u32
//! 0x10  payload (totalSize - 16 bytes)
//! ```
//!
//! On write the payload is padded to a 16-byte boundary and `totalSize` is
//! back-patched with the padded length.

use std::path::Path;

use tifo_common::{BinaryReader, BinaryWriter, Error as CommonError};
use tracing::debug;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::Result;

/// Fixed header shared by RX3 sections.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct RawSectionHeader {
    /// Section size including this header and trailing padding.
    pub total_size: u32,
    pub unknown: [u32; 3],
}

impl RawSectionHeader {
    /// Header size in bytes.
    pub const SIZE: usize = 16;
}

const _: () = assert!(std::mem::size_of::<RawSectionHeader>() == RawSectionHeader::SIZE);

/// A decoded bone name section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BoneName {
    /// Size as read.
    pub total_size: u32,
    pub unknown_1: u32,
    pub unknown_2: u32,
    pub unknown_3: u32,
    /// Opaque payload, including any alignment padding present on read.
    pub data: Vec<u8>,
}

impl BoneName {
    /// Load a bone name section from a file holding only that section.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::parse(&data)
    }

    /// Decode a section at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Self::read(&mut reader)
    }

    /// Decode a section at the current position.
    ///
    /// # Errors
    ///
    /// A `totalSize` smaller than the header is a malformed header; a
    /// payload running past the buffer is truncation.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let header: RawSectionHeader = reader.read_struct()?;
        let total_size = header.total_size;
        let [unknown_1, unknown_2, unknown_3] = header.unknown;

        let payload_len = (total_size as usize)
            .checked_sub(RawSectionHeader::SIZE)
            .ok_or_else(|| CommonError::malformed("totalSize of at least 16", total_size))?;
        let data = reader.read_bytes(payload_len)?.to_vec();

        debug!(total_size, payload = payload_len, "decoded bone name section");

        Ok(Self {
            total_size,
            unknown_1,
            unknown_2,
            unknown_3,
            data,
        })
    }

    /// Write the section at the writer's position and return its total size.
    ///
    /// The stored `total_size` is ignored; the written value is measured
    /// after padding to 16 bytes.
    pub fn write(&self, writer: &mut BinaryWriter) -> Result<u32> {
        let start = writer.position();
        let header = RawSectionHeader {
            total_size: 0,
            unknown: [self.unknown_1, self.unknown_2, self.unknown_3],
        };
        writer.write_bytes(header.as_bytes())?;
        writer.write_bytes(&self.data)?;
        writer.align16()?;
        Ok(writer.write_section_total_size(start)?)
    }

    /// Encode the section on its own, returning the bytes and the
    /// back-patched total size.
    pub fn encode(&self) -> Result<(Vec<u8>, u32)> {
        let mut writer = BinaryWriter::with_capacity(RawSectionHeader::SIZE + self.data.len() + 16);
        let total_size = self.write(&mut writer)?;
        Ok((writer.into_inner(), total_size))
    }

    /// Encode the section and write it to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<u32> {
        let (bytes, total_size) = self.encode()?;
        std::fs::write(path, bytes)?;
        Ok(total_size)
    }
}
