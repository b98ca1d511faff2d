//! Container tags.
//!
//! Every audio bin starts with an 8-byte ASCII tag naming its format. The
//! set of tags is closed; anything else is kept as [`ContainerTag::Unknown`]
//! with the raw bytes for diagnostics.

use std::fmt;

use tifo_common::util::tag_display;
use tifo_common::BinaryReader;

use crate::Result;

/// Length of a container tag in bytes.
pub const TAG_LEN: usize = 8;

/// Position of the first header field after the tag.
pub const HEADER_START: usize = TAG_LEN;

/// The format tag at the start of an audio bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ContainerTag {
    /// `0TVE00CP` - event system.
    EventSystem,
    /// `0CPS00CP` - sentences.
    Sentences,
    /// `0FRG00CP` - graffiti runtime.
    GraffitiRuntime,
    /// `0PER00CP` - repetition pools.
    RepetitionPools,
    /// `0XTC00CP` - context data.
    ContextData,
    /// Any other tag.
    Unknown([u8; TAG_LEN]),
}

impl ContainerTag {
    /// All recognized tags.
    pub const KNOWN: [ContainerTag; 5] = [
        Self::EventSystem,
        Self::Sentences,
        Self::GraffitiRuntime,
        Self::RepetitionPools,
        Self::ContextData,
    ];

    /// Classify raw tag bytes.
    pub fn from_bytes(tag: [u8; TAG_LEN]) -> Self {
        match &tag {
            b"0TVE00CP" => Self::EventSystem,
            b"0CPS00CP" => Self::Sentences,
            b"0FRG00CP" => Self::GraffitiRuntime,
            b"0PER00CP" => Self::RepetitionPools,
            b"0XTC00CP" => Self::ContextData,
            _ => Self::Unknown(tag),
        }
    }

    /// The raw tag bytes.
    pub fn as_bytes(&self) -> [u8; TAG_LEN] {
        match self {
            Self::EventSystem => *b"0TVE00CP",
            Self::Sentences => *b"0CPS00CP",
            Self::GraffitiRuntime => *b"0FRG00CP",
            Self::RepetitionPools => *b"0PER00CP",
            Self::ContextData => *b"0XTC00CP",
            Self::Unknown(tag) => *tag,
        }
    }

    /// Whether this is one of the recognized tags.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Read the tag at the start of `data`.
    pub fn sniff(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Ok(Self::from_bytes(reader.read_tag()?))
    }
}

impl fmt::Display for ContainerTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&tag_display(&self.as_bytes()))
    }
}

/// Check the tag at offset 0 and leave the cursor on the first header field.
pub(crate) fn expect_container(reader: &mut BinaryReader<'_>, tag: ContainerTag) -> Result<()> {
    reader.seek(0)?;
    reader.expect_magic(&tag.as_bytes())?;
    Ok(())
}

/// Read the four opaque `u16` words that follow the tag in most containers.
pub(crate) fn read_header_words(reader: &mut BinaryReader<'_>) -> Result<[u16; 4]> {
    let mut words = [0u16; 4];
    for word in &mut words {
        *word = reader.read_u16()?;
    }
    Ok(words)
}
