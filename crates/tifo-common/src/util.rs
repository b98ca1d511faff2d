//! Small string and number helpers shared by the readers and writers.

use crate::{Error, Result};

/// Decode bytes as Latin-1, one byte per `char`.
///
/// Null-terminated names in the audio containers are single-byte text, so
/// every byte maps to exactly one code point and decoding never fails.
pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Encode a string as Latin-1. Code points above U+00FF become `?`.
pub fn latin1_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Slice `bytes` up to (not including) the first zero byte.
pub fn trim_nul(bytes: &[u8]) -> &[u8] {
    match memchr::memchr(0, bytes) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}

/// Render a fixed-width tag for diagnostics, escaping non-printable bytes.
pub fn tag_display(tag: &[u8]) -> String {
    tag.escape_ascii().to_string()
}

/// Round `value` up to the next multiple of `alignment` (a power of two).
#[inline]
pub const fn align_up(value: usize, alignment: usize) -> usize {
    (value + (alignment - 1)) & !(alignment - 1)
}

/// Convert a signed on-disk count into a `usize`.
///
/// Counts are stored as `i32`; a negative count means the header is corrupt.
pub fn checked_count(raw: i32, field: &str) -> Result<usize> {
    usize::try_from(raw).map_err(|_| Error::malformed(format!("non-negative {field}"), raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_roundtrip() {
        let bytes = [b'C', b'r', 0xE9, b'w'];
        let s = latin1(&bytes);
        assert_eq!(s.chars().count(), 4);
        assert_eq!(latin1_bytes(&s), bytes);
    }

    #[test]
    fn test_trim_nul() {
        assert_eq!(trim_nul(b"abc\0def"), b"abc");
        assert_eq!(trim_nul(b"abc"), b"abc");
        assert_eq!(trim_nul(b"\0"), b"");
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 16), 0);
        assert_eq!(align_up(1, 16), 16);
        assert_eq!(align_up(16, 16), 16);
        assert_eq!(align_up(17, 16), 32);
    }

    #[test]
    fn test_checked_count() {
        assert_eq!(checked_count(3, "numEvents").unwrap(), 3);
        assert!(checked_count(-1, "numEvents").unwrap_err().is_malformed_header());
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(tag_display(b"0TVE00CP"), "0TVE00CP");
        assert_eq!(tag_display(&[0x41, 0x00]), "A\\x00");
    }
}
