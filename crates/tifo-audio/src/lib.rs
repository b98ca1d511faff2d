//! Audio framework bin containers.
//!
//! Every audio bin starts with an 8-byte tag naming its format:
//!
//! | Tag        | Document                  |
//! |------------|---------------------------|
//! | `0TVE00CP` | [`EventSystemFile`]       |
//! | `0CPS00CP` | [`SentencesFile`]         |
//! | `0FRG00CP` | [`GraffitiRuntimeFile`]   |
//! | `0PER00CP` | [`RepetitionPoolsFile`]   |
//! | `0XTC00CP` | [`ContextDataFile`]       |
//!
//! Use [`AudioBinFile::parse`] to decode a buffer of any kind, or a
//! document's own `parse` when the kind is known. Sentences refer to the
//! other documents by id; see [`xref`] for resolving those links.
//!
//! # Example
//!
//! ```no_run
//! use tifo_audio::{AudioBinFile, Siblings};
//!
//! let sentences = AudioBinFile::parse(&std::fs::read("commentary_sentences.bin")?)?;
//! let pools = AudioBinFile::parse(&std::fs::read("commentary_repetitionpools.bin")?)?;
//! let siblings = Siblings::new(pools.document.as_repetition_pools(), None);
//!
//! if let Some(doc) = sentences.document.as_sentences() {
//!     for (section, sentence) in doc.sentences_by_id() {
//!         for phrase in &sentence.phrases {
//!             for reference in phrase.cross_references() {
//!                 println!("{} {} -> {}", section.trigger_name, sentence.id, siblings.resolve(reference));
//!             }
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;
mod tag;

pub mod context;
pub mod event_system;
pub mod graffiti;
pub mod module;
pub mod repetition;
pub mod sentences;
pub mod xref;

pub use context::{ContextDataFile, ContextId};
pub use error::{Error, Result};
pub use event_system::{Event, EventSystemFile, Parameter, ParameterType, ParameterValue};
pub use file::{parse_many, AudioBinFile, AudioDocument};
pub use graffiti::{GraffitiRuntimeFile, TagTable};
pub use module::{ContextLimits, FormatVersion, ModuleInfo};
pub use repetition::{Pool, PoolBody, PoolKind, RepetitionPoolsFile};
pub use sentences::{Phrase, PhraseParameter, Section, SectionEntry, SectionGroup, Sentence, SentencesFile, TagKind};
pub use tag::{ContainerTag, HEADER_START, TAG_LEN};
pub use xref::{event_parameter_name, repetition_pool_name, CrossReference, Siblings};
