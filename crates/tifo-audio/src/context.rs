//! Context data (`0XTC00CP`) containers.
//!
//! Context data drives the crowd and commentary context modules. It shares
//! its parameter records with the event system; ids are stored inline after
//! the header and parameters live behind an absolute offset table.

use tifo_common::util::checked_count;
use tifo_common::{BinaryReader, OffsetBase, OffsetTable};
use tracing::debug;

use crate::event_system::Parameter;
use crate::tag::{expect_container, ContainerTag};
use crate::Result;

/// An inline `(id, unknown)` entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContextId {
    pub id: i32,
    pub unknown_1: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContextDataFile {
    pub header_words: [u16; 2],
    pub system_crc: i32,
    pub num_events: i32,
    pub offset_offsets_parameters: i32,
    pub unknown_2: i32,
    pub unknown_3: i32,
    pub ids: Vec<ContextId>,
    pub parameter_table: OffsetTable,
    pub parameters: Vec<Parameter>,
}

impl ContextDataFile {
    /// Decode context data from a complete container buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Self::read(&mut reader)
    }

    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        expect_container(reader, ContainerTag::ContextData)?;
        let header_words = [reader.read_u16()?, reader.read_u16()?];

        let system_crc = reader.read_i32()?;
        let num_events = reader.read_i32()?;
        let num_parameters = checked_count(reader.read_i32()?, "numParameters")?;
        let num_ids = checked_count(reader.read_i32()?, "numIds")?;
        let offset_offsets_parameters = reader.read_i32()?;
        let unknown_2 = reader.read_i32()?;
        let unknown_3 = reader.read_i32()?;

        let mut ids = Vec::with_capacity(reader.capacity_hint(num_ids));
        for _ in 0..num_ids {
            ids.push(ContextId {
                id: reader.read_i32()?,
                unknown_1: reader.read_i32()?,
            });
        }

        let parameter_table = OffsetTable::read_at(
            reader,
            offset_offsets_parameters,
            num_parameters,
            OffsetBase::Absolute,
        )?;
        let parameters = parameter_table.resolve(reader, Parameter::read)?;

        debug!(
            system_crc,
            ids = ids.len(),
            parameters = parameters.len(),
            "decoded context data"
        );

        Ok(Self {
            header_words,
            system_crc,
            num_events,
            offset_offsets_parameters,
            unknown_2,
            unknown_3,
            ids,
            parameter_table,
            parameters,
        })
    }

    /// The first parameter with `id`, in document order.
    pub fn parameter(&self, id: i32) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.id == id)
    }
}
