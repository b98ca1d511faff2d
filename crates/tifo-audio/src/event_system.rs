//! Event system (`0TVE00CP`) containers.
//!
//! An event system declares the events a sound module reacts to and the
//! parameters those events carry. Both lists are stored behind offset
//! tables, and each parameter points to its own table of named values.
//!
//! # Layout
//!
//! ```text
//! 0x00  tag "0TVE00CP"
//! 0x08  4 x u16 header words
//! 0x10  systemCrc:i32 numEvents:i32 numParameters:i32
//!       offsetOffsetsEvents:i32 offsetOffsetsParameters:i32
//! ```
//!
//! Every offset in this container (both tables, their entries, and the
//! per-parameter value tables) is absolute from the start of the stream.

use tifo_common::util::checked_count;
use tifo_common::{BinaryReader, OffsetBase, OffsetTable};
use tracing::{debug, warn};

use crate::tag::{expect_container, read_header_words, ContainerTag};
use crate::Result;

/// Type code of an event system parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ParameterType {
    /// Enumeration whose values are bit flags.
    EnumBit,
    /// Plain integer.
    #[default]
    Int,
    /// A code outside the known set.
    Unknown(i32),
}

impl ParameterType {
    /// Classify a raw type code.
    pub fn from_raw(code: i32) -> Self {
        match code {
            1 => Self::EnumBit,
            3 => Self::Int,
            other => Self::Unknown(other),
        }
    }

    /// The raw type code.
    pub fn to_raw(self) -> i32 {
        match self {
            Self::EnumBit => 1,
            Self::Int => 3,
            Self::Unknown(code) => code,
        }
    }
}

/// A named value of an enumerated parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParameterValue {
    pub unknown_1: i32,
    pub value: i32,
    pub name: String,
}

impl ParameterValue {
    /// Read a parameter value at the current position.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            unknown_1: reader.read_i32()?,
            value: reader.read_i32()?,
            name: reader.read_cstring()?,
        })
    }
}

/// An event system parameter.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Parameter {
    pub kind: ParameterType,
    pub id: i32,
    pub unknown_1: i32,
    /// Absolute position of the value offset table.
    pub offset_offsets_values: i32,
    pub name: String,
    pub value_table: OffsetTable,
    pub values: Vec<ParameterValue>,
}

impl Parameter {
    /// Read a parameter and resolve its value table.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let raw_kind = reader.read_i32()?;
        let id = reader.read_i32()?;
        let num_values = checked_count(reader.read_i32()?, "numValues")?;
        let unknown_1 = reader.read_i32()?;
        let offset_offsets_values = reader.read_i32()?;
        let name = reader.read_cstring()?;

        let kind = ParameterType::from_raw(raw_kind);
        if let ParameterType::Unknown(code) = kind {
            warn!(id, code, name = %name, "unknown parameter type");
        }

        let value_table =
            OffsetTable::read_at(reader, offset_offsets_values, num_values, OffsetBase::Absolute)?;
        let values = value_table.resolve(reader, ParameterValue::read)?;

        Ok(Self {
            kind,
            id,
            unknown_1,
            offset_offsets_values,
            name,
            value_table,
            values,
        })
    }

    /// Number of values declared by this parameter.
    pub fn num_values(&self) -> usize {
        self.values.len()
    }
}

/// An event declared by the event system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Event {
    pub size_parameters: i32,
    /// The three words between the parameter count and the CRCs.
    pub unknown_1: [i32; 3],
    pub system_crc: i16,
    pub interface_crc: i16,
    /// The six words between the CRCs and the parameter ids.
    pub unknown_2: [i32; 6],
    /// Ids of the parameters this event carries, in declaration order.
    pub parameter_ids: Vec<i32>,
    pub name: String,
}

impl Event {
    /// Read an event at the current position.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let size_parameters = reader.read_i32()?;
        let num_parameters = checked_count(reader.read_i32()?, "event numParameters")?;
        let unknown_1 = reader.read_i32_array()?;
        let system_crc = reader.read_i16()?;
        let interface_crc = reader.read_i16()?;
        let unknown_2 = reader.read_i32_array()?;

        let mut parameter_ids = Vec::with_capacity(reader.capacity_hint(num_parameters));
        for _ in 0..num_parameters {
            parameter_ids.push(reader.read_i32()?);
        }

        let name = reader.read_cstring()?;

        Ok(Self {
            size_parameters,
            unknown_1,
            system_crc,
            interface_crc,
            unknown_2,
            parameter_ids,
            name,
        })
    }
}

/// A decoded event system container.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EventSystemFile {
    pub header_words: [u16; 4],
    pub system_crc: i32,
    pub offset_offsets_events: i32,
    pub offset_offsets_parameters: i32,
    pub event_table: OffsetTable,
    pub parameter_table: OffsetTable,
    pub events: Vec<Event>,
    pub parameters: Vec<Parameter>,
}

impl EventSystemFile {
    /// Decode an event system from a complete container buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Self::read(&mut reader)
    }

    /// Decode an event system; the tag is checked at offset 0.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        expect_container(reader, ContainerTag::EventSystem)?;
        let header_words = read_header_words(reader)?;

        let system_crc = reader.read_i32()?;
        let num_events = checked_count(reader.read_i32()?, "numEvents")?;
        let num_parameters = checked_count(reader.read_i32()?, "numParameters")?;
        let offset_offsets_events = reader.read_i32()?;
        let offset_offsets_parameters = reader.read_i32()?;

        let event_table =
            OffsetTable::read_at(reader, offset_offsets_events, num_events, OffsetBase::Absolute)?;
        let events = event_table.resolve(reader, Event::read)?;

        let parameter_table = OffsetTable::read_at(
            reader,
            offset_offsets_parameters,
            num_parameters,
            OffsetBase::Absolute,
        )?;
        let parameters = parameter_table.resolve(reader, Parameter::read)?;

        debug!(
            system_crc,
            events = events.len(),
            parameters = parameters.len(),
            "decoded event system"
        );

        Ok(Self {
            header_words,
            system_crc,
            offset_offsets_events,
            offset_offsets_parameters,
            event_table,
            parameter_table,
            events,
            parameters,
        })
    }

    /// Number of events.
    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    /// Number of parameters.
    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Index of the first parameter with `id`, in document order.
    pub fn parameter_index(&self, id: i32) -> Option<usize> {
        self.parameters.iter().position(|p| p.id == id)
    }

    /// The first parameter with `id`, in document order.
    pub fn parameter(&self, id: i32) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.id == id)
    }

    /// The parameters an event carries, resolved by id.
    ///
    /// Ids with no matching parameter are skipped.
    pub fn event_parameters<'s>(&'s self, event: &'s Event) -> impl Iterator<Item = &'s Parameter> + 's {
        event.parameter_ids.iter().filter_map(move |&id| self.parameter(id))
    }

    /// Parameters sorted by id, for presentation.
    pub fn sorted_parameters(&self) -> Vec<&Parameter> {
        let mut sorted: Vec<_> = self.parameters.iter().collect();
        sorted.sort_by_key(|p| p.id);
        sorted
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use pretty_assertions::assert_eq;
    use tifo_common::BinaryWriter;

    use super::*;

    /// A parameter to place in a test event system.
    pub(crate) struct TestParameter<'a> {
        pub kind: i32,
        pub id: i32,
        pub name: &'a str,
        pub values: &'a [(i32, &'a str)],
    }

    /// Build an event system with one event referencing every parameter.
    pub(crate) fn build(event_name: &str, parameters: &[TestParameter<'_>]) -> Vec<u8> {
        let mut w = BinaryWriter::new();
        w.write_bytes(b"0TVE00CP").unwrap();
        for word in [1u16, 2, 3, 4] {
            w.write_u16(word).unwrap();
        }
        w.write_i32(0x1234).unwrap();
        w.write_i32(1).unwrap();
        w.write_i32(parameters.len() as i32).unwrap();
        let events_field = w.reserve_u32().unwrap();
        let parameters_field = w.reserve_u32().unwrap();

        // Event
        let event_at = w.position();
        w.write_i32(parameters.len() as i32 * 4).unwrap();
        w.write_i32(parameters.len() as i32).unwrap();
        for v in [10, 11, 12] {
            w.write_i32(v).unwrap();
        }
        w.write_i16(-7).unwrap();
        w.write_i16(42).unwrap();
        for v in 0..6 {
            w.write_i32(v).unwrap();
        }
        for p in parameters {
            w.write_i32(p.id).unwrap();
        }
        w.write_cstring(event_name).unwrap();

        // Parameters, each followed by its value table and values
        let mut parameter_offsets = Vec::new();
        for p in parameters {
            parameter_offsets.push(w.position());
            w.write_i32(p.kind).unwrap();
            w.write_i32(p.id).unwrap();
            w.write_i32(p.values.len() as i32).unwrap();
            w.write_i32(99).unwrap();
            let values_field = w.reserve_u32().unwrap();
            w.write_cstring(p.name).unwrap();

            let table_at = w.position();
            w.patch_u32(values_field, table_at as u32).unwrap();
            let slots: Vec<usize> = p.values.iter().map(|_| w.reserve_u32().unwrap()).collect();
            for (slot, (value, name)) in slots.iter().zip(p.values.iter()) {
                let at = w.position();
                w.patch_u32(*slot, at as u32).unwrap();
                w.write_i32(0).unwrap();
                w.write_i32(*value).unwrap();
                w.write_cstring(name).unwrap();
            }
        }

        // Tables
        let events_table = w.position();
        w.write_u32(event_at as u32).unwrap();
        w.patch_u32(events_field, events_table as u32).unwrap();

        let parameters_table = w.position();
        for offset in parameter_offsets {
            w.write_u32(offset as u32).unwrap();
        }
        w.patch_u32(parameters_field, parameters_table as u32).unwrap();

        w.into_inner()
    }

    #[test]
    fn test_single_int_parameter() {
        let data = build(
            "Goal",
            &[TestParameter {
                kind: 3,
                id: 5,
                name: "Foo",
                values: &[],
            }],
        );
        let file = EventSystemFile::parse(&data).unwrap();

        assert_eq!(file.header_words, [1, 2, 3, 4]);
        assert_eq!(file.system_crc, 0x1234);
        assert_eq!(file.num_parameters(), 1);

        let parameter = &file.parameters[0];
        assert_eq!(parameter.id, 5);
        assert_eq!(parameter.name, "Foo");
        assert_eq!(parameter.kind, ParameterType::Int);
        assert!(parameter.values.is_empty());
    }

    #[test]
    fn test_event_fields() {
        let data = build(
            "Goal",
            &[TestParameter {
                kind: 3,
                id: 5,
                name: "Foo",
                values: &[],
            }],
        );
        let file = EventSystemFile::parse(&data).unwrap();

        assert_eq!(file.num_events(), 1);
        let event = &file.events[0];
        assert_eq!(event.name, "Goal");
        assert_eq!(event.size_parameters, 4);
        assert_eq!(event.unknown_1, [10, 11, 12]);
        assert_eq!(event.system_crc, -7);
        assert_eq!(event.interface_crc, 42);
        assert_eq!(event.unknown_2, [0, 1, 2, 3, 4, 5]);
        assert_eq!(event.parameter_ids, vec![5]);

        let names: Vec<_> = file.event_parameters(event).map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Foo"]);
    }

    #[test]
    fn test_enum_parameter_values_in_table_order() {
        let data = build(
            "Chant",
            &[
                TestParameter {
                    kind: 1,
                    id: 9,
                    name: "Team",
                    values: &[(4, "Away"), (1, "Home"), (2, "Neutral")],
                },
                TestParameter {
                    kind: 3,
                    id: 2,
                    name: "Score",
                    values: &[],
                },
            ],
        );
        let file = EventSystemFile::parse(&data).unwrap();

        let team = file.parameter(9).unwrap();
        assert_eq!(team.kind, ParameterType::EnumBit);
        let values: Vec<_> = team.values.iter().map(|v| (v.value, v.name.as_str())).collect();
        assert_eq!(values, vec![(4, "Away"), (1, "Home"), (2, "Neutral")]);
        assert_eq!(team.value_table.len(), 3);

        assert_eq!(file.parameter_index(2), Some(1));
        let sorted: Vec<_> = file.sorted_parameters().iter().map(|p| p.id).collect();
        assert_eq!(sorted, vec![2, 9]);
    }

    #[test]
    fn test_unknown_parameter_type_is_kept() {
        let data = build(
            "Goal",
            &[TestParameter {
                kind: 7,
                id: 1,
                name: "Odd",
                values: &[],
            }],
        );
        let file = EventSystemFile::parse(&data).unwrap();
        assert_eq!(file.parameters[0].kind, ParameterType::Unknown(7));
        assert_eq!(file.parameters[0].kind.to_raw(), 7);
    }

    #[test]
    fn test_wrong_tag_is_malformed() {
        let mut data = build("Goal", &[]);
        data[..8].copy_from_slice(b"0CPS00CP");
        let err = EventSystemFile::parse(&data).unwrap_err();
        assert!(err.is_malformed_header());
    }

    #[test]
    fn test_truncated_parameter_table() {
        let data = build(
            "Goal",
            &[TestParameter {
                kind: 3,
                id: 5,
                name: "Foo",
                values: &[],
            }],
        );
        let err = EventSystemFile::parse(&data[..data.len() - 2]).unwrap_err();
        assert!(err.is_truncated());
    }
}
