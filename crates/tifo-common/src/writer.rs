//! Binary writer for re-encoding containers.
//!
//! [`BinaryWriter`] mirrors [`BinaryReader`](crate::BinaryReader): little-endian
//! scalars, fixed-width and null-terminated strings, plus the section-size
//! back-patch pattern (reserve a size field, write the payload, then
//! overwrite the field with the measured length).

use std::io::{self, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::reader::SIZED_STRING_LEN;
use crate::util::{align_up, latin1_bytes};
use crate::Result;

/// Default alignment for section padding.
pub const SECTION_ALIGNMENT: usize = 16;

/// A growable little-endian writer with absolute seeking.
///
/// Seeking past the end zero-fills the gap, so back-patching and
/// forward-placed strings never leave holes in the output.
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
    inner: io::Cursor<Vec<u8>>,
}

impl BinaryWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty writer with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: io::Cursor::new(Vec::with_capacity(capacity)),
        }
    }

    /// Current write position.
    #[inline]
    pub fn position(&self) -> usize {
        self.inner.position() as usize
    }

    /// Number of bytes written so far (the furthest extent, not the position).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.get_ref().len()
    }

    /// Check if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.get_ref().is_empty()
    }

    /// The bytes written so far.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        self.inner.get_ref()
    }

    /// Consume the writer and return the buffer.
    pub fn into_inner(self) -> Vec<u8> {
        self.inner.into_inner()
    }

    /// Seek to an absolute position, zero-filling if it lies past the end.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        let buffer = self.inner.get_mut();
        if position > buffer.len() {
            buffer.resize(position, 0);
        }
        self.inner.seek(SeekFrom::Start(position as u64))?;
        Ok(())
    }

    /// Write a single byte.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.inner.write_u8(value)?;
        Ok(())
    }

    /// Write a signed byte.
    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.inner.write_i8(value)?;
        Ok(())
    }

    /// Write a little-endian u16.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.inner.write_u16::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a little-endian i16.
    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.inner.write_i16::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a little-endian u32.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.inner.write_u32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a little-endian i32.
    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.inner.write_i32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write a little-endian f32.
    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.inner.write_f32::<LittleEndian>(value)?;
        Ok(())
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    /// Write `count` zero bytes.
    pub fn write_zeros(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.inner.write_u8(0)?;
        }
        Ok(())
    }

    /// Write a string into a fixed-width field, truncating or zero-padding.
    pub fn write_null_padded(&mut self, value: &str, width: usize) -> Result<()> {
        let bytes = value.as_bytes();
        let used = bytes.len().min(width);
        self.write_bytes(&bytes[..used])?;
        self.write_zeros(width - used)
    }

    /// Write a Latin-1 string followed by a zero terminator.
    pub fn write_cstring(&mut self, value: &str) -> Result<()> {
        self.write_bytes(&latin1_bytes(value))?;
        self.write_u8(0)
    }

    /// Write a Latin-1 string into a fixed 64-byte field.
    pub fn write_sized_64(&mut self, value: &str) -> Result<()> {
        let bytes = latin1_bytes(value);
        let used = bytes.len().min(SIZED_STRING_LEN);
        self.write_bytes(&bytes[..used])?;
        self.write_zeros(SIZED_STRING_LEN - used)
    }

    /// Write a 16-bit length-prefixed string at an absolute offset.
    ///
    /// The string is zero-padded so that count plus payload ends on a 4-byte
    /// boundary. The write position is restored afterwards.
    pub fn write_prefixed_string_at(&mut self, offset: usize, value: &str) -> Result<()> {
        let current = self.position();
        self.seek(offset)?;

        let bytes = value.as_bytes();
        let count = bytes.len().min(u16::MAX as usize);
        self.write_u16(count as u16)?;
        self.write_bytes(&bytes[..count])?;

        let total = count + 2;
        self.write_zeros(align_up(total, 4) - total)?;

        self.seek(current)
    }

    /// Pad with zero bytes up to the next multiple of `alignment`.
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        let position = self.position();
        self.write_zeros(align_up(position, alignment) - position)
    }

    /// Pad with zero bytes up to the next 16-byte boundary.
    pub fn align16(&mut self) -> Result<()> {
        self.align(SECTION_ALIGNMENT)
    }

    /// Write a zero u32 placeholder and return its position.
    pub fn reserve_u32(&mut self) -> Result<usize> {
        let at = self.position();
        self.write_u32(0)?;
        Ok(at)
    }

    /// Overwrite the u32 at `at`, keeping the current write position.
    pub fn patch_u32(&mut self, at: usize, value: u32) -> Result<()> {
        let current = self.position();
        self.seek(at)?;
        self.write_u32(value)?;
        self.seek(current)
    }

    /// Back-patch a section size field.
    ///
    /// Writes `position - start` into the u32 at `start` and returns it.
    pub fn write_section_total_size(&mut self, start: usize) -> Result<u32> {
        let total = (self.position() - start) as u32;
        self.patch_u32(start, total)?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BinaryReader;

    #[test]
    fn test_write_primitives() {
        let mut writer = BinaryWriter::new();
        writer.write_u32(0x04030201).unwrap();
        writer.write_i16(-1).unwrap();
        writer.write_f32(1.0).unwrap();

        assert_eq!(
            writer.into_inner(),
            vec![0x01, 0x02, 0x03, 0x04, 0xFF, 0xFF, 0x00, 0x00, 0x80, 0x3F]
        );
    }

    #[test]
    fn test_null_padded_truncates() {
        let mut writer = BinaryWriter::new();
        writer.write_null_padded("CRWDX", 4).unwrap();
        writer.write_null_padded("ab", 4).unwrap();

        assert_eq!(writer.as_slice(), b"CRWDab\0\0");
    }

    #[test]
    fn test_cstring_and_sized_64() {
        let mut writer = BinaryWriter::new();
        writer.write_cstring("Foo").unwrap();
        writer.write_sized_64("flare").unwrap();

        let data = writer.into_inner();
        assert_eq!(data.len(), 4 + 64);

        let mut reader = BinaryReader::new(&data);
        assert_eq!(reader.read_cstring().unwrap(), "Foo");
        assert_eq!(reader.read_sized_64().unwrap(), "flare");
    }

    #[test]
    fn test_prefixed_string_at() {
        let mut writer = BinaryWriter::new();
        writer.write_u32(0xDEADBEEF).unwrap();
        writer.write_prefixed_string_at(8, "abc").unwrap();

        assert_eq!(writer.position(), 4);
        assert_eq!(writer.len(), 8 + 2 + 3 + 3);

        let data = writer.into_inner();
        let mut reader = BinaryReader::new(&data);
        assert_eq!(reader.read_prefixed_string_at(8).unwrap(), "abc");
    }

    #[test]
    fn test_section_size_backpatch() {
        let mut writer = BinaryWriter::new();
        writer.write_u8(0xAA).unwrap();

        let start = writer.reserve_u32().unwrap();
        writer.write_bytes(&[1, 2, 3]).unwrap();
        writer.align16().unwrap();
        let total = writer.write_section_total_size(start).unwrap();

        assert_eq!(writer.position(), 16);
        assert_eq!(total, 15);

        let data = writer.into_inner();
        let mut reader = BinaryReader::new(&data);
        reader.seek(start).unwrap();
        assert_eq!(reader.read_u32().unwrap(), 15);
    }

    #[test]
    fn test_seek_past_end_zero_fills() {
        let mut writer = BinaryWriter::new();
        writer.seek(3).unwrap();
        writer.write_u8(9).unwrap();

        assert_eq!(writer.into_inner(), vec![0, 0, 0, 9]);
    }
}
