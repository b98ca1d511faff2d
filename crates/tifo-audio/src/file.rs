//! Container dispatch.
//!
//! [`AudioBinFile::parse`] sniffs the 8-byte tag and hands the whole buffer
//! to the matching decoder. Unknown tags are not an error: the file is kept
//! as [`AudioDocument::Unrecognized`].

use tracing::{debug, warn};

use crate::context::ContextDataFile;
use crate::event_system::EventSystemFile;
use crate::graffiti::GraffitiRuntimeFile;
use crate::module::ModuleInfo;
use crate::repetition::RepetitionPoolsFile;
use crate::sentences::SentencesFile;
use crate::tag::ContainerTag;
use crate::Result;

/// A decoded document of any supported kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "document"))]
pub enum AudioDocument {
    EventSystem(EventSystemFile),
    Sentences(SentencesFile),
    GraffitiRuntime(GraffitiRuntimeFile),
    RepetitionPools(RepetitionPoolsFile),
    ContextData(ContextDataFile),
    /// The tag is not one of the supported containers.
    Unrecognized,
}

impl AudioDocument {
    pub fn as_event_system(&self) -> Option<&EventSystemFile> {
        match self {
            Self::EventSystem(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_sentences(&self) -> Option<&SentencesFile> {
        match self {
            Self::Sentences(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_graffiti_runtime(&self) -> Option<&GraffitiRuntimeFile> {
        match self {
            Self::GraffitiRuntime(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_repetition_pools(&self) -> Option<&RepetitionPoolsFile> {
        match self {
            Self::RepetitionPools(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_context_data(&self) -> Option<&ContextDataFile> {
        match self {
            Self::ContextData(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized)
    }
}

/// An audio bin: its tag and the document decoded from it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AudioBinFile {
    pub tag: ContainerTag,
    pub document: AudioDocument,
}

impl AudioBinFile {
    /// Decode an audio bin of any supported kind.
    ///
    /// # Errors
    ///
    /// Fails if the buffer is shorter than a tag, or if the matched decoder
    /// runs out of data.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let tag = ContainerTag::sniff(data)?;
        debug!(%tag, len = data.len(), "dispatching audio bin");

        let document = match tag {
            ContainerTag::EventSystem => AudioDocument::EventSystem(EventSystemFile::parse(data)?),
            ContainerTag::Sentences => AudioDocument::Sentences(SentencesFile::parse(data)?),
            ContainerTag::GraffitiRuntime => {
                AudioDocument::GraffitiRuntime(GraffitiRuntimeFile::parse(data)?)
            }
            ContainerTag::RepetitionPools => {
                AudioDocument::RepetitionPools(RepetitionPoolsFile::parse(data)?)
            }
            ContainerTag::ContextData => AudioDocument::ContextData(ContextDataFile::parse(data)?),
            ContainerTag::Unknown(_) => {
                warn!(%tag, "unrecognized audio bin");
                AudioDocument::Unrecognized
            }
        };

        Ok(Self { tag, document })
    }

    /// Module type and name an exporter uses for this file.
    pub fn module_info(&self, file_name: &str) -> ModuleInfo {
        ModuleInfo::for_file(self.tag, file_name)
    }
}

/// Decode many audio bins, one result per input in input order.
///
/// A failing input does not affect the others. With the `parallel` feature
/// the inputs are decoded on the rayon thread pool.
pub fn parse_many<S: AsRef<[u8]> + Sync>(inputs: &[S]) -> Vec<Result<AudioBinFile>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        inputs
            .par_iter()
            .map(|data| AudioBinFile::parse(data.as_ref()))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        inputs
            .iter()
            .map(|data| AudioBinFile::parse(data.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_system::tests::{build as build_events, TestParameter};
    use crate::repetition::tests::build as build_pools;

    #[test]
    fn test_dispatch_event_system() {
        let data = build_events(
            "Goal",
            &[TestParameter {
                kind: 3,
                id: 5,
                name: "Foo",
                values: &[],
            }],
        );
        let file = AudioBinFile::parse(&data).unwrap();

        assert_eq!(file.tag, ContainerTag::EventSystem);
        let events = file.document.as_event_system().unwrap();
        assert_eq!(events.parameters[0].name, "Foo");
        assert!(file.document.as_sentences().is_none());
    }

    #[test]
    fn test_unknown_tag_is_unrecognized() {
        let mut data = b"ZZZZ00CP".to_vec();
        data.extend_from_slice(&[0; 32]);
        let file = AudioBinFile::parse(&data).unwrap();

        assert_eq!(file.tag, ContainerTag::Unknown(*b"ZZZZ00CP"));
        assert_eq!(file.document, AudioDocument::Unrecognized);
        assert!(!file.document.is_recognized());
    }

    #[test]
    fn test_short_buffer_is_truncated() {
        let err = AudioBinFile::parse(b"0PER").unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn test_batch_isolates_failures() {
        let good = build_pools(&[(b"0MIT", 7, 4, "Crowd_Roar")]);
        let mut bad = good.clone();
        bad.truncate(good.len() - 6);

        let results = parse_many(&[good.as_slice(), bad.as_slice(), b"?".as_slice()]);

        assert_eq!(results.len(), 3);
        let pools = results[0].as_ref().unwrap();
        assert_eq!(pools.document.as_repetition_pools().unwrap().pools[0].name, "Crowd_Roar");
        assert!(results[1].as_ref().unwrap_err().is_truncated());
        assert!(results[2].as_ref().unwrap_err().is_truncated());
    }

    #[test]
    fn test_module_info_uses_tag() {
        let data = build_pools(&[]);
        let file = AudioBinFile::parse(&data).unwrap();
        assert_eq!(file.module_info("repetitionpools.bin").name, "GraffitiPlayer");
    }
}
