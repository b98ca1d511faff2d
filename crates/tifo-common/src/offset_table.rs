//! Offset tables: header-declared arrays of 32-bit offsets, each locating
//! one child record elsewhere in the same buffer.
//!
//! Resolving a table visits the entries in table order (never sorted by
//! offset). For each entry the cursor jumps to `base + offset`, the child is
//! decoded, and the cursor goes back to the end of the table before the next
//! entry. Child decoders may resolve tables of their own.

use tracing::trace;

use crate::{BinaryReader, Error, Result};

/// How a stored offset is interpreted.
///
/// Each container format documents which one it uses; it is never inferred.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OffsetBase {
    /// Offsets count from the start of the stream.
    #[default]
    Absolute,
    /// Offsets count from a fixed position in the stream.
    Relative(usize),
}

impl OffsetBase {
    /// Resolve `offset` to an absolute position inside a buffer of `length`
    /// bytes. Positions before the start or past the end are truncation.
    pub fn resolve(self, offset: i32, length: usize) -> Result<usize> {
        let base = match self {
            Self::Absolute => 0,
            Self::Relative(base) => base as i64,
        };
        let target = base + i64::from(offset);
        if target < 0 || target > length as i64 {
            return Err(Error::TruncatedStream {
                offset: target,
                needed: 0,
                length,
            });
        }
        Ok(target as usize)
    }
}

/// A decoded offset table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OffsetTable {
    base: OffsetBase,
    offsets: Vec<i32>,
}

impl OffsetTable {
    /// Create a table from already-known offsets.
    pub fn new(base: OffsetBase, offsets: Vec<i32>) -> Self {
        Self { base, offsets }
    }

    /// Read `count` offsets starting at `table_offset`.
    ///
    /// The cursor is left just past the table. A `count` of zero yields an
    /// empty table without seeking.
    pub fn read(
        reader: &mut BinaryReader<'_>,
        table_offset: usize,
        count: usize,
        base: OffsetBase,
    ) -> Result<Self> {
        if count == 0 {
            return Ok(Self::new(base, Vec::new()));
        }

        reader.seek(table_offset)?;
        let mut offsets = Vec::with_capacity(reader.capacity_hint(count));
        for _ in 0..count {
            offsets.push(reader.read_i32()?);
        }

        Ok(Self::new(base, offsets))
    }

    /// Read a table whose own position is a stored absolute offset.
    ///
    /// The table offset is only validated when there is something to read.
    pub fn read_at(
        reader: &mut BinaryReader<'_>,
        table_offset: i32,
        count: usize,
        base: OffsetBase,
    ) -> Result<Self> {
        if count == 0 {
            return Ok(Self::new(base, Vec::new()));
        }
        let position = OffsetBase::Absolute.resolve(table_offset, reader.len())?;
        Self::read(reader, position, count, base)
    }

    /// Read `count` offsets stored inline at the current position.
    pub fn read_inline(
        reader: &mut BinaryReader<'_>,
        count: usize,
        base: OffsetBase,
    ) -> Result<Self> {
        let here = reader.position();
        Self::read(reader, here, count, base)
    }

    /// The base the offsets are relative to.
    pub fn base(&self) -> OffsetBase {
        self.base
    }

    /// The raw offsets, in table order.
    pub fn offsets(&self) -> &[i32] {
        &self.offsets
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Check if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Decode one child per entry, in table order.
    ///
    /// The cursor position on return equals the position on entry, also when
    /// `decode` fails part-way through.
    ///
    /// `decode` may use any error type that a common [`Error`] converts into,
    /// so format crates can pass their record readers directly.
    pub fn resolve<'a, T, E, F>(
        &self,
        reader: &mut BinaryReader<'a>,
        mut decode: F,
    ) -> std::result::Result<Vec<T>, E>
    where
        F: FnMut(&mut BinaryReader<'a>) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        let mut children = Vec::with_capacity(self.offsets.len());
        for (index, &offset) in self.offsets.iter().enumerate() {
            let target = self.base.resolve(offset, reader.len())?;
            trace!(index, offset, target, "offset table entry");

            let mut at = reader.jump(target)?;
            children.push(decode(&mut *at)?);
        }
        Ok(children)
    }
}

/// Read an offset table and decode its children in one step.
///
/// Returns the table alongside the children so documents can keep it.
pub fn resolve_offset_table<'a, T, E, F>(
    reader: &mut BinaryReader<'a>,
    table_offset: usize,
    count: usize,
    base: OffsetBase,
    decode: F,
) -> std::result::Result<(OffsetTable, Vec<T>), E>
where
    F: FnMut(&mut BinaryReader<'a>) -> std::result::Result<T, E>,
    E: From<Error>,
{
    let table = OffsetTable::read(reader, table_offset, count, base)?;
    let children = table.resolve(reader, decode)?;
    Ok((table, children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryWriter;

    /// Table at 0 with three offsets pointing at u32 values laid out in
    /// reverse order, so table order differs from byte order.
    fn sample() -> Vec<u8> {
        let mut writer = BinaryWriter::new();
        for offset in [20, 16, 12] {
            writer.write_i32(offset).unwrap();
        }
        for value in [300u32, 200, 100] {
            writer.write_u32(value).unwrap();
        }
        writer.into_inner()
    }

    #[test]
    fn test_children_in_table_order() {
        let data = sample();
        let mut reader = BinaryReader::new(&data);

        let (table, values) =
            resolve_offset_table(&mut reader, 0, 3, OffsetBase::Absolute, |r| r.read_u32()).unwrap();

        assert_eq!(table.offsets(), &[20, 16, 12]);
        assert_eq!(values, vec![100, 200, 300]);
        assert_eq!(reader.position(), 12);
    }

    #[test]
    fn test_cursor_restored_between_children() {
        let data = sample();
        let mut reader = BinaryReader::new(&data);
        let table = OffsetTable::read(&mut reader, 0, 3, OffsetBase::Absolute).unwrap();

        let mut seen = Vec::new();
        table
            .resolve(&mut reader, |r| {
                seen.push(r.position());
                r.read_u32()
            })
            .unwrap();

        assert_eq!(seen, vec![20, 16, 12]);
        assert_eq!(reader.position(), 12);
    }

    #[test]
    fn test_relative_base() {
        let data = sample();
        let mut reader = BinaryReader::new(&data);
        let table = OffsetTable::new(OffsetBase::Relative(12), vec![0, 8]);

        let values = table.resolve(&mut reader, |r| r.read_u32()).unwrap();
        assert_eq!(values, vec![300, 100]);
    }

    #[test]
    fn test_zero_count_does_not_seek() {
        let data = sample();
        let mut reader = BinaryReader::new(&data);
        reader.seek(4).unwrap();

        let (table, values) =
            resolve_offset_table(&mut reader, 9999, 0, OffsetBase::Absolute, |r| r.read_u32()).unwrap();

        assert!(table.is_empty());
        assert!(values.is_empty());
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_offset_past_end_is_truncated() {
        let data = sample();
        let mut reader = BinaryReader::new(&data);
        let table = OffsetTable::new(OffsetBase::Absolute, vec![12, 64]);

        let err = table.resolve(&mut reader, |r| r.read_u32()).unwrap_err();
        assert!(err.is_truncated());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_negative_resolved_offset_is_truncated() {
        assert!(OffsetBase::Relative(4).resolve(-8, 16).unwrap_err().is_truncated());
        assert_eq!(OffsetBase::Relative(4).resolve(-4, 16).unwrap(), 0);
    }

    #[test]
    fn test_nested_tables() {
        // Outer table at 0 -> child at 4: [count=2][inner offsets 16, 20] -> values
        let mut writer = BinaryWriter::new();
        writer.write_i32(4).unwrap();
        writer.write_i32(2).unwrap();
        writer.write_i32(16).unwrap();
        writer.write_i32(20).unwrap();
        writer.write_u32(7).unwrap();
        writer.write_u32(8).unwrap();
        let data = writer.into_inner();

        let mut reader = BinaryReader::new(&data);
        let (_, nested) = resolve_offset_table(&mut reader, 0, 1, OffsetBase::Absolute, |r| -> Result<Vec<u32>> {
            let count = r.read_i32()? as usize;
            let inner = OffsetTable::read_inline(r, count, OffsetBase::Absolute)?;
            inner.resolve(r, |r| r.read_u32())
        })
        .unwrap();

        assert_eq!(nested, vec![vec![7, 8]]);
        assert_eq!(reader.position(), 4);
    }
}
