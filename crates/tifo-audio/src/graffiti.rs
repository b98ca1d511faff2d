//! Graffiti runtime (`0FRG00CP`) containers.
//!
//! A graffiti database maps `(tagId, tagValue)` pairs to lists of sample
//! references. Tag tables are stored inline after the header; each table
//! points to its reference list through an offset relative to byte 28.

use rustc_hash::FxHashSet;
use tifo_common::util::checked_count;
use tifo_common::{BinaryReader, OffsetBase};
use tracing::{debug, trace};

use crate::tag::{expect_container, read_header_words, ContainerTag};
use crate::Result;

/// Base of the reference offsets stored in tag tables.
pub const REFS_BASE: usize = 28;

/// A tag table: the samples selected for one tag value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TagTable {
    pub tag_id: i32,
    pub tag_value: i32,
    pub num_tags: i32,
    pub offset_refs: i32,
    pub data_refs: Vec<i32>,
    /// Empty unless the container stores tag names.
    pub tag_name: String,
}

impl TagTable {
    /// Read a tag table and follow its reference offset.
    ///
    /// The cursor is left just past the four inline fields.
    pub fn read(reader: &mut BinaryReader<'_>, has_tag_name: bool) -> Result<Self> {
        let tag_id = reader.read_i32()?;
        let tag_value = reader.read_i32()?;
        let num_tags = reader.read_i32()?;
        let offset_refs = reader.read_i32()?;

        let target = OffsetBase::Relative(REFS_BASE).resolve(offset_refs, reader.len())?;
        trace!(tag_id, tag_value, target, "tag table refs");
        let mut at = reader.jump(target)?;

        let num_refs = checked_count(at.read_i32()?, "numRefs")?;
        let mut data_refs = Vec::with_capacity(at.capacity_hint(num_refs));
        for _ in 0..num_refs {
            data_refs.push(at.read_i32()?);
        }

        let tag_name = if has_tag_name {
            at.read_cstring()?
        } else {
            String::new()
        };

        Ok(Self {
            tag_id,
            tag_value,
            num_tags,
            offset_refs,
            data_refs,
            tag_name,
        })
    }

    pub fn num_refs(&self) -> usize {
        self.data_refs.len()
    }
}

/// A decoded graffiti runtime container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GraffitiRuntimeFile {
    pub header_words: [u16; 4],
    /// Raw flag; `1` means tag tables carry names.
    pub flag_has_tag_name: i32,
    pub unknown_1: i32,
    /// The `numTables * 2` words between the header and the tables.
    pub skipped: Vec<i32>,
    pub tables: Vec<TagTable>,
}

impl GraffitiRuntimeFile {
    /// Decode a graffiti runtime from a complete container buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Self::read(&mut reader)
    }

    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        expect_container(reader, ContainerTag::GraffitiRuntime)?;
        let header_words = read_header_words(reader)?;

        let flag_has_tag_name = reader.read_i32()?;
        let num_tables = checked_count(reader.read_i32()?, "numTables")?;
        let unknown_1 = reader.read_i32()?;

        let num_skipped = num_tables.saturating_mul(2);
        let mut skipped = Vec::with_capacity(reader.capacity_hint(num_skipped));
        for _ in 0..num_skipped {
            skipped.push(reader.read_i32()?);
        }

        let has_tag_name = flag_has_tag_name == 1;
        let mut tables = Vec::with_capacity(reader.capacity_hint(num_tables));
        for _ in 0..num_tables {
            tables.push(TagTable::read(reader, has_tag_name)?);
        }

        debug!(tables = tables.len(), has_tag_name, "decoded graffiti runtime");

        Ok(Self {
            header_words,
            flag_has_tag_name,
            unknown_1,
            skipped,
            tables,
        })
    }

    pub fn has_tag_name(&self) -> bool {
        self.flag_has_tag_name == 1
    }

    pub fn num_tables(&self) -> usize {
        self.tables.len()
    }

    /// Number of distinct sample references across all tables.
    pub fn num_samples(&self) -> usize {
        self.tables
            .iter()
            .flat_map(|t| t.data_refs.iter().copied())
            .collect::<FxHashSet<_>>()
            .len()
    }

    /// Display name of the table at `index`.
    ///
    /// Without stored names, tables are called `name_1`, `name_2`, ...
    pub fn tag_name(&self, index: usize) -> String {
        if self.has_tag_name() {
            self.tables
                .get(index)
                .map(|t| t.tag_name.clone())
                .unwrap_or_default()
        } else {
            format!("name_{}", index + 1)
        }
    }

    /// Tables ordered by `(tagId, tagValue)`.
    pub fn sorted_tables(&self) -> Vec<&TagTable> {
        let mut sorted: Vec<_> = self.tables.iter().collect();
        sorted.sort_by_key(|t| (t.tag_id, t.tag_value));
        sorted
    }

    /// Sorted tables paired with their display names.
    ///
    /// Generated names follow the sorted position, not the decode order.
    pub fn named_tables(&self) -> Vec<(String, &TagTable)> {
        self.sorted_tables()
            .into_iter()
            .enumerate()
            .map(|(position, table)| {
                let name = if self.has_tag_name() {
                    table.tag_name.clone()
                } else {
                    format!("name_{}", position + 1)
                };
                (name, table)
            })
            .collect()
    }
}
