//! Binary cursor for decoding offset-indexed containers.
//!
//! This module provides [`BinaryReader`], a cursor over a borrowed byte slice
//! with absolute seeking, and [`PositionGuard`], which restores the cursor
//! position when a decoder returns from following an offset.

use std::ops::{Deref, DerefMut};

use tracing::trace;
use zerocopy::FromBytes;

use crate::util::{latin1, trim_nul};
use crate::{Error, Result};

/// Size of the fixed padded strings read by [`BinaryReader::read_sized_64`].
pub const SIZED_STRING_LEN: usize = 64;

/// A binary reader over a byte slice.
///
/// All multi-byte values are little-endian. The position always satisfies
/// `0 <= position <= len`; any read or seek that would leave that range
/// fails with [`Error::TruncatedStream`] and leaves the position untouched.
///
/// # Example
///
/// ```
/// use tifo_common::BinaryReader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x04030201);
/// assert_eq!(reader.read_u32().unwrap(), 0x08070605);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Get the whole underlying buffer.
    #[inline]
    pub const fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Get the remaining bytes as a slice.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    /// Seek to an absolute position. Seeking to `len()` is allowed.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.data.len() {
            return Err(Error::TruncatedStream {
                offset: position as i64,
                needed: 0,
                length: self.data.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Advance the position by a number of bytes.
    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.read_bytes(count).map(|_| ())
    }

    /// Remember the current position; it is restored when the guard drops.
    #[inline]
    pub fn mark(&mut self) -> PositionGuard<'_, 'a> {
        let saved = self.position;
        PositionGuard {
            reader: self,
            saved,
        }
    }

    /// Seek to `position` and return a guard that seeks back on drop.
    ///
    /// The guard restores the position on every exit path, including `?`
    /// returns from inside the jumped-to decoder. If the seek itself fails,
    /// the position is unchanged.
    pub fn jump(&mut self, position: usize) -> Result<PositionGuard<'_, 'a>> {
        let saved = self.position;
        self.seek(position)?;
        trace!(from = saved, to = position, "jump");
        Ok(PositionGuard {
            reader: self,
            saved,
        })
    }

    /// Upper bound for preallocating `count` records from this buffer.
    ///
    /// Every record occupies at least one byte, so a corrupt count cannot
    /// request more capacity than the buffer could ever fill.
    #[inline]
    pub fn capacity_hint(&self, count: usize) -> usize {
        count.min(self.data.len())
    }

    fn truncated(&self, needed: usize) -> Error {
        Error::TruncatedStream {
            offset: self.position as i64,
            needed,
            length: self.data.len(),
        }
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(self.truncated(count));
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Peek at the next byte without advancing the position.
    #[inline]
    pub fn peek_u8(&self) -> Result<u8> {
        self.peek_bytes(1).map(|b| b[0])
    }

    /// Peek at a little-endian u32 without advancing.
    #[inline]
    pub fn peek_u32(&self) -> Result<u32> {
        let bytes = self.peek_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-width tag such as `b"CRWD"` or `b"0TVE00CP"`.
    #[inline]
    pub fn read_tag<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut tag = [0u8; N];
        tag.copy_from_slice(bytes);
        Ok(tag)
    }

    /// Read a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a signed byte.
    #[inline]
    pub fn read_i8(&mut self) -> Result<i8> {
        self.read_u8().map(|b| b as i8)
    }

    /// Read a boolean (non-zero = true).
    #[inline]
    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_u8().map(|b| b != 0)
    }

    /// Read a little-endian u16.
    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_tag().map(u16::from_le_bytes)
    }

    /// Read a little-endian i16.
    #[inline]
    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_tag().map(i16::from_le_bytes)
    }

    /// Read a little-endian u32.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_tag().map(u32::from_le_bytes)
    }

    /// Read a little-endian i32.
    #[inline]
    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_tag().map(i32::from_le_bytes)
    }

    /// Read a little-endian f32.
    #[inline]
    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_tag().map(f32::from_le_bytes)
    }

    /// Read `N` consecutive little-endian i32 words.
    pub fn read_i32_array<const N: usize>(&mut self) -> Result<[i32; N]> {
        let mut words = [0i32; N];
        for word in &mut words {
            *word = self.read_i32()?;
        }
        Ok(words)
    }

    /// Read a null-terminated Latin-1 string and consume the terminator.
    pub fn read_cstring(&mut self) -> Result<String> {
        let rest = self.remaining_bytes();
        let len = memchr::memchr(0, rest).ok_or_else(|| self.truncated(rest.len() + 1))?;
        let value = latin1(&rest[..len]);
        self.position += len + 1;
        Ok(value)
    }

    /// Read `width` bytes and keep the text before the first zero byte.
    pub fn read_null_padded(&mut self, width: usize) -> Result<String> {
        let bytes = self.read_bytes(width)?;
        Ok(String::from_utf8_lossy(trim_nul(bytes)).into_owned())
    }

    /// Read a 16-bit length-prefixed string stored at an absolute offset.
    ///
    /// The count and the bytes are both read at `offset`; the position is
    /// restored afterwards.
    pub fn read_prefixed_string_at(&mut self, offset: usize) -> Result<String> {
        let mut at = self.jump(offset)?;
        let count = at.read_u16()? as usize;
        let bytes = at.read_bytes(count)?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Read a string padded to a fixed 64-byte field.
    ///
    /// The whole field is consumed regardless of where the terminator is.
    pub fn read_sized_64(&mut self) -> Result<String> {
        let bytes = self.read_bytes(SIZED_STRING_LEN)?;
        Ok(latin1(trim_nul(bytes)))
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.peek_bytes(size)?;
        let value = T::read_from_bytes(bytes).map_err(|_| self.truncated(size))?;
        self.position += size;
        Ok(value)
    }

    /// Expect specific magic bytes.
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        let actual = self.read_bytes(expected.len())?;
        if actual != expected {
            return Err(Error::malformed(
                expected.escape_ascii().to_string(),
                actual.escape_ascii(),
            ));
        }
        Ok(())
    }
}

/// Scoped cursor position save/restore.
///
/// Dereferences to the underlying [`BinaryReader`]; when dropped, the
/// reader's position is set back to where it was when the guard was made.
#[derive(Debug)]
pub struct PositionGuard<'r, 'a> {
    reader: &'r mut BinaryReader<'a>,
    saved: usize,
}

impl PositionGuard<'_, '_> {
    /// The position that will be restored.
    #[inline]
    pub fn saved_position(&self) -> usize {
        self.saved
    }
}

impl<'a> Deref for PositionGuard<'_, 'a> {
    type Target = BinaryReader<'a>;

    fn deref(&self) -> &Self::Target {
        self.reader
    }
}

impl DerefMut for PositionGuard<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.reader
    }
}

impl Drop for PositionGuard<'_, '_> {
    fn drop(&mut self) {
        self.reader.position = self.saved;
    }
}
