//! Repetition pools (`0PER00CP`) containers.
//!
//! Repetition pools stop the same line from being played too often. The
//! header is followed by `(id, offsetPool)` entries; each offset is absolute
//! and points to a pool body that starts with a 4-byte variant tag.

use std::fmt;

use tifo_common::util::{checked_count, tag_display};
use tifo_common::{BinaryReader, OffsetBase};
use tracing::{debug, warn};

use crate::tag::{expect_container, read_header_words, ContainerTag};
use crate::Result;

/// Kind of a repetition pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PoolKind {
    /// `0MIT`: entries become available again after a delay.
    Timed,
    /// `0ESU`: each entry is played once.
    UseOnce,
    /// `0FHS`: entries are shuffled.
    Shuffle,
}

impl PoolKind {
    /// Classify a 4-byte variant tag.
    pub fn from_tag(tag: &[u8; 4]) -> Option<Self> {
        match tag {
            b"0MIT" => Some(Self::Timed),
            b"0ESU" => Some(Self::UseOnce),
            b"0FHS" => Some(Self::Shuffle),
            _ => None,
        }
    }

    pub fn tag(self) -> [u8; 4] {
        match self {
            Self::Timed => *b"0MIT",
            Self::UseOnce => *b"0ESU",
            Self::Shuffle => *b"0FHS",
        }
    }

    /// Element name used by audio framework exports.
    pub fn element_name(self) -> &'static str {
        match self {
            Self::Timed => "TimedRepetitionPool",
            Self::UseOnce => "UseOnceRepetitionPool",
            Self::Shuffle => "ShuffleRepetitionPool",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// Variant-specific part of a pool body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PoolBody {
    Timed {
        unknown_1: i32,
        unknown_2: i32,
        repeat_time: f32,
        unknown_3: [i32; 5],
    },
    UseOnce {
        unknown: [i32; 6],
    },
    Shuffle {
        unknown: [i32; 6],
    },
    /// Unrecognized variant tag; nothing past the tag was read.
    Unknown { tag: [u8; 4] },
}

impl Default for PoolBody {
    fn default() -> Self {
        Self::Unknown { tag: [0; 4] }
    }
}

impl PoolBody {
    pub fn kind(&self) -> Option<PoolKind> {
        match self {
            Self::Timed { .. } => Some(PoolKind::Timed),
            Self::UseOnce { .. } => Some(PoolKind::UseOnce),
            Self::Shuffle { .. } => Some(PoolKind::Shuffle),
            Self::Unknown { .. } => None,
        }
    }
}

/// A repetition pool.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pool {
    /// Id from the pool body, or from the table entry for unknown variants.
    pub id: i32,
    /// Id stored in the table entry.
    pub entry_id: i32,
    pub offset_pool: i32,
    pub size: i32,
    pub name: String,
    pub body: PoolBody,
}

impl Pool {
    /// Read a table entry and the pool body it points to.
    ///
    /// The cursor is left just past the 8-byte entry.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let entry_id = reader.read_i32()?;
        let offset_pool = reader.read_i32()?;

        let target = OffsetBase::Absolute.resolve(offset_pool, reader.len())?;
        let mut at = reader.jump(target)?;
        let tag: [u8; 4] = at.read_tag()?;

        let mut pool = Self {
            id: entry_id,
            entry_id,
            offset_pool,
            ..Self::default()
        };

        pool.body = match PoolKind::from_tag(&tag) {
            Some(PoolKind::Timed) => {
                pool.id = at.read_i32()?;
                let unknown_1 = at.read_i32()?;
                pool.size = at.read_i32()?;
                let unknown_2 = at.read_i32()?;
                let repeat_time = at.read_f32()?;
                let unknown_3 = at.read_i32_array()?;
                pool.name = at.read_cstring()?;
                PoolBody::Timed {
                    unknown_1,
                    unknown_2,
                    repeat_time,
                    unknown_3,
                }
            }
            Some(kind) => {
                pool.id = at.read_i32()?;
                pool.size = at.read_i32()?;
                let unknown = at.read_i32_array()?;
                pool.name = at.read_cstring()?;
                if kind == PoolKind::UseOnce {
                    PoolBody::UseOnce { unknown }
                } else {
                    PoolBody::Shuffle { unknown }
                }
            }
            None => {
                warn!(entry_id, tag = %tag_display(&tag), "unknown repetition pool variant");
                PoolBody::Unknown { tag }
            }
        };

        Ok(pool)
    }

    pub fn kind(&self) -> Option<PoolKind> {
        self.body.kind()
    }

    /// Repeat delay of timed pools.
    pub fn repeat_time(&self) -> Option<f32> {
        match self.body {
            PoolBody::Timed { repeat_time, .. } => Some(repeat_time),
            _ => None,
        }
    }
}

/// A decoded repetition pools container.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RepetitionPoolsFile {
    pub header_words: [u16; 4],
    pub unknown_1: i32,
    pub pools: Vec<Pool>,
}

impl RepetitionPoolsFile {
    /// Decode repetition pools from a complete container buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Self::read(&mut reader)
    }

    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        expect_container(reader, ContainerTag::RepetitionPools)?;
        let header_words = read_header_words(reader)?;

        let num_pools = checked_count(reader.read_i32()?, "numPools")?;
        let unknown_1 = reader.read_i32()?;

        let mut pools = Vec::with_capacity(reader.capacity_hint(num_pools));
        for _ in 0..num_pools {
            pools.push(Pool::read(reader)?);
        }

        debug!(pools = pools.len(), "decoded repetition pools");

        Ok(Self {
            header_words,
            unknown_1,
            pools,
        })
    }

    pub fn num_pools(&self) -> usize {
        self.pools.len()
    }

    /// The first pool with `id`, in document order.
    pub fn pool(&self, id: i32) -> Option<&Pool> {
        self.pools.iter().find(|p| p.id == id)
    }

    /// Pools ordered by id.
    pub fn sorted_pools(&self) -> Vec<&Pool> {
        let mut sorted: Vec<_> = self.pools.iter().collect();
        sorted.sort_by_key(|p| p.id);
        sorted
    }
}
