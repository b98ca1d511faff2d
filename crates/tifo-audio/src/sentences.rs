//! Sentences (`0CPS00CP`) containers.
//!
//! Sentences are speech templates: each sentence is a list of phrases, and
//! each phrase is built from tag-builder parameters that either pick a fixed
//! sample bank tag or reference a parameter of the triggering event.
//!
//! Groups in the header point to pairs of `(unknown, sectionOffset)`; a group
//! offset of `-1` marks an empty slot. Section, sentence and phrase offsets
//! are all absolute.

use tifo_common::util::checked_count;
use tifo_common::{BinaryReader, OffsetBase, OffsetTable};
use tracing::{debug, trace, warn};

use crate::tag::{expect_container, read_header_words, ContainerTag};
use crate::xref::CrossReference;
use crate::Result;

/// Group offset marking an absent group.
pub const ABSENT_GROUP: i32 = -1;

/// Size of one `(unknown, sectionOffset)` pair.
const SECTION_PAIR_LEN: usize = 8;

/// Kind of a tag-builder parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TagKind {
    /// Takes its value from a parameter of the triggering event.
    #[default]
    EventRef,
    /// Uses a fixed tag value.
    Fixed,
    /// A kind code outside the known set.
    Unknown(u8),
}

impl TagKind {
    /// Classify a raw kind byte.
    pub fn from_raw(code: u8) -> Self {
        match code {
            1 => Self::EventRef,
            2 => Self::Fixed,
            other => Self::Unknown(other),
        }
    }

    /// The raw kind byte.
    pub fn to_raw(self) -> u8 {
        match self {
            Self::EventRef => 1,
            Self::Fixed => 2,
            Self::Unknown(code) => code,
        }
    }
}

/// A tag-builder parameter inside a phrase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PhraseParameter {
    pub kind: TagKind,
    pub event_index: u8,
    pub unknown_2: u8,
    pub unknown_3: u8,
    pub tag_id: i32,
    pub tag_value: i32,
}

impl PhraseParameter {
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let kind = TagKind::from_raw(reader.read_u8()?);
        let event_index = reader.read_u8()?;
        let unknown_2 = reader.read_u8()?;
        let unknown_3 = reader.read_u8()?;
        let tag_id = reader.read_i32()?;
        let tag_value = reader.read_i32()?;

        if let TagKind::Unknown(code) = kind {
            warn!(code, tag_id, "unknown tag builder kind");
        }

        Ok(Self {
            kind,
            event_index,
            unknown_2,
            unknown_3,
            tag_id,
            tag_value,
        })
    }
}

/// A phrase of a sentence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Phrase {
    pub repetition_id: i16,
    pub unknown_1: u8,
    pub parameters: Vec<PhraseParameter>,
}

impl Phrase {
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let repetition_id = reader.read_i16()?;
        let num_parameters = reader.read_u8()?;
        let unknown_1 = reader.read_u8()?;

        let mut parameters = Vec::with_capacity(num_parameters as usize);
        for _ in 0..num_parameters {
            parameters.push(PhraseParameter::read(reader)?);
        }

        Ok(Self {
            repetition_id,
            unknown_1,
            parameters,
        })
    }

    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Ids this phrase refers to in sibling documents.
    ///
    /// The repetition pool comes first, then the tag id of every event-ref
    /// parameter in phrase order.
    pub fn cross_references(&self) -> Vec<CrossReference> {
        let mut refs = Vec::with_capacity(1 + self.parameters.len());
        refs.push(CrossReference::RepetitionPool(i32::from(self.repetition_id)));
        refs.extend(
            self.parameters
                .iter()
                .filter(|p| p.kind == TagKind::EventRef)
                .map(|p| CrossReference::EventParameter(p.tag_id)),
        );
        refs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Sentence {
    pub id: i32,
    pub unknown_1: i32,
    pub priority: i32,
    pub phrase_table: OffsetTable,
    pub phrases: Vec<Phrase>,
}

impl Sentence {
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let id = reader.read_i32()?;
        let unknown_1 = reader.read_i32()?;
        let priority = reader.read_i32()?;
        let num_phrases = checked_count(reader.read_i32()?, "numPhrases")?;

        let phrase_table = OffsetTable::read_inline(reader, num_phrases, OffsetBase::Absolute)?;
        let phrases = phrase_table.resolve(reader, Phrase::read)?;

        Ok(Self {
            id,
            unknown_1,
            priority,
            phrase_table,
            phrases,
        })
    }
}

/// A section: the sentences fired by one trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Section {
    pub unknown_1: i32,
    pub sentence_table: OffsetTable,
    pub sentences: Vec<Sentence>,
    pub trigger_name: String,
}

impl Section {
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let num_sentences = checked_count(reader.read_i32()?, "numSentences")?;
        let unknown_1 = reader.read_i32()?;

        let sentence_table = OffsetTable::read_inline(reader, num_sentences, OffsetBase::Absolute)?;
        let sentences = sentence_table.resolve(reader, Sentence::read)?;

        // The trigger name follows the inline offsets.
        let trigger_name = reader.read_cstring()?;

        Ok(Self {
            unknown_1,
            sentence_table,
            sentences,
            trigger_name,
        })
    }
}

/// One `(unknown, sectionOffset)` pair and the section it points to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SectionEntry {
    pub unknown: i32,
    pub section_offset: i32,
    pub section: Section,
}

/// A header group entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SectionGroup {
    /// Declared number of sections, kept even for absent groups.
    pub num_subsections: i32,
    pub offset: i32,
    pub entries: Vec<SectionEntry>,
}

impl SectionGroup {
    /// Read a group entry and, unless absent, the sections it points to.
    ///
    /// The cursor is left just past the 8-byte group entry.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let num_subsections = reader.read_i32()?;
        let offset = reader.read_i32()?;

        if offset == ABSENT_GROUP {
            trace!(num_subsections, "absent section group");
            return Ok(Self {
                num_subsections,
                offset,
                entries: Vec::new(),
            });
        }

        let count = checked_count(num_subsections, "numSubsections")?;
        if count == 0 {
            // The pair offset is only followed when there is a pair to read.
            return Ok(Self {
                num_subsections,
                offset,
                entries: Vec::new(),
            });
        }

        let mut entries = Vec::with_capacity(reader.capacity_hint(count));
        let mut at = reader.mark();
        let pairs = OffsetBase::Absolute.resolve(offset, at.len())?;
        for j in 0..count {
            at.seek(pairs + SECTION_PAIR_LEN * j)?;
            let unknown = at.read_i32()?;
            let section_offset = at.read_i32()?;

            let target = OffsetBase::Absolute.resolve(section_offset, at.len())?;
            at.seek(target)?;
            entries.push(SectionEntry {
                unknown,
                section_offset,
                section: Section::read(&mut *at)?,
            });
        }

        Ok(Self {
            num_subsections,
            offset,
            entries,
        })
    }

    /// Whether this group slot is empty.
    pub fn is_absent(&self) -> bool {
        self.offset == ABSENT_GROUP
    }
}

/// A decoded sentences container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SentencesFile {
    pub header_words: [u16; 4],
    pub unknown_1: i32,
    pub groups: Vec<SectionGroup>,
}

impl SentencesFile {
    /// Decode a sentences container from a complete buffer.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        Self::read(&mut reader)
    }

    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        expect_container(reader, ContainerTag::Sentences)?;
        let header_words = read_header_words(reader)?;

        let num_sections = checked_count(reader.read_i32()?, "numSections")?;
        let unknown_1 = reader.read_i32()?;

        let mut groups = Vec::with_capacity(reader.capacity_hint(num_sections));
        for _ in 0..num_sections {
            groups.push(SectionGroup::read(reader)?);
        }

        let file = Self {
            header_words,
            unknown_1,
            groups,
        };
        debug!(
            groups = file.groups.len(),
            sections = file.sections().count(),
            "decoded sentences"
        );
        Ok(file)
    }

    /// All sections in document order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.groups
            .iter()
            .flat_map(|g| g.entries.iter().map(|e| &e.section))
    }

    /// All sentences with their section, sorted by sentence id.
    ///
    /// The sort is stable, so sentences sharing an id keep document order.
    pub fn sentences_by_id(&self) -> Vec<(&Section, &Sentence)> {
        let mut sorted: Vec<_> = self
            .sections()
            .flat_map(|section| section.sentences.iter().map(move |s| (section, s)))
            .collect();
        sorted.sort_by_key(|(_, s)| s.id);
        sorted
    }
}
