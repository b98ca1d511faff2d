//! Audio framework module naming.
//!
//! Exporters wrap each document in a module element whose type and name are
//! not stored in the container. They are derived from the file stem instead,
//! following the naming used by the shipped audio banks.

use std::path::Path;

use crate::tag::ContainerTag;

/// Speech module owners, matched as `{prefix}_{kind}` anywhere in the stem.
const SPEAKERS: [(&str, &str); 3] = [
    ("announcer", "Announcer"),
    ("commentary", "CommentarySpeech"),
    ("playercalls", "PlayerCalls"),
];

const SPEECH_MODULE: &str = "SpeechModule";
const GRAFFITI_PLAYER_MODULE: &str = "GraffitiPlayerModule";
const CONTEXT_MODULE: &str = "ContextModule";

/// Framework version an exporter declares for a container kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FormatVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl FormatVersion {
    const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// The version declared for `kind`, if exports exist for it.
    pub fn for_kind(kind: ContainerTag) -> Option<Self> {
        match kind {
            ContainerTag::Sentences => Some(Self::new(3, 5, 0)),
            ContainerTag::GraffitiRuntime => Some(Self::new(2, 1, 0)),
            ContainerTag::RepetitionPools => Some(Self::new(1, 1, 0)),
            ContainerTag::EventSystem | ContainerTag::ContextData => Some(Self::new(1, 2, 4)),
            ContainerTag::Unknown(_) => None,
        }
    }
}

/// Limits attached to context modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContextLimits {
    pub max_num_contexts: u32,
    pub max_num_groups: u32,
    pub max_num_valid_contexts: u32,
    pub max_num_triggered_contexts: u32,
    pub num_passives: u32,
    pub priority_decay_rate: u32,
}

impl ContextLimits {
    /// Limits of the crowd context module.
    pub const CROWD: Self = Self {
        max_num_contexts: 750,
        max_num_groups: 100,
        max_num_valid_contexts: 400,
        max_num_triggered_contexts: 100,
        num_passives: 150,
        priority_decay_rate: 1000,
    };

    /// Limits of the commentary trigger context module.
    pub const COMMENTARY_TRIGGERS: Self = Self {
        max_num_contexts: 1200,
        max_num_groups: 100,
        max_num_valid_contexts: 500,
        max_num_triggered_contexts: 150,
        num_passives: 150,
        priority_decay_rate: 1000,
    };
}

/// Module type and name for an exported document.
///
/// Both are empty when the file name matches no known module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModuleInfo {
    pub module_type: &'static str,
    pub name: &'static str,
    pub limits: Option<ContextLimits>,
}

impl ModuleInfo {
    const fn new(module_type: &'static str, name: &'static str) -> Self {
        Self {
            module_type,
            name,
            limits: None,
        }
    }

    /// Derive the module for a document of `kind` loaded from `file_name`.
    pub fn for_file(kind: ContainerTag, file_name: &str) -> Self {
        // Context data bank names are matched as written.
        let stem = file_stem(file_name, kind != ContainerTag::ContextData);

        let suffix = match kind {
            ContainerTag::Sentences => "sentences",
            ContainerTag::GraffitiRuntime => "graffitiruntime",
            ContainerTag::RepetitionPools => "repetitionpools",
            ContainerTag::EventSystem | ContainerTag::ContextData => "eventsystem",
            ContainerTag::Unknown(_) => return Self::default(),
        };

        for (prefix, name) in SPEAKERS {
            if stem.contains(&format!("{prefix}_{suffix}")) {
                return Self::new(SPEECH_MODULE, name);
            }
        }

        match (kind, stem.as_str()) {
            (ContainerTag::GraffitiRuntime, "graffitiruntime")
            | (ContainerTag::RepetitionPools, "repetitionpools") => {
                Self::new(GRAFFITI_PLAYER_MODULE, "GraffitiPlayer")
            }
            (ContainerTag::EventSystem | ContainerTag::ContextData, "chant_eventsystem") => {
                Self::new(GRAFFITI_PLAYER_MODULE, "GraffitiPlayer")
            }
            (ContainerTag::EventSystem | ContainerTag::ContextData, "crowd_eventsystem") => Self {
                limits: Some(ContextLimits::CROWD),
                ..Self::new(CONTEXT_MODULE, "CrowdContextModule")
            },
            (
                ContainerTag::EventSystem | ContainerTag::ContextData,
                "commentary_triggers_eventsystem",
            ) => Self {
                limits: Some(ContextLimits::COMMENTARY_TRIGGERS),
                ..Self::new(CONTEXT_MODULE, "ContextModule")
            },
            _ => Self::default(),
        }
    }

    pub fn is_known(&self) -> bool {
        !self.module_type.is_empty()
    }
}

/// File name without directories and the last extension, lower-cased when
/// `fold_case` is set.
///
/// Both `/` and `\` separate directories, since bank paths come from
/// Windows tooling. A leading dot is part of the name, not an extension.
fn file_stem(file_name: &str, fold_case: bool) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stem = Path::new(base)
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    if fold_case {
        stem.to_lowercase()
    } else {
        stem.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speech_modules() {
        let info = ModuleInfo::for_file(ContainerTag::Sentences, "audio/ENG_Commentary_Sentences.bin");
        assert_eq!(info, ModuleInfo::new("SpeechModule", "CommentarySpeech"));

        let info = ModuleInfo::for_file(ContainerTag::RepetitionPools, r"C:\banks\playercalls_repetitionpools.bin");
        assert_eq!(info.name, "PlayerCalls");

        // Prefix must match the container kind.
        let info = ModuleInfo::for_file(ContainerTag::GraffitiRuntime, "announcer_sentences.bin");
        assert!(!info.is_known());
    }

    #[test]
    fn test_exact_graffiti_player_names() {
        let info = ModuleInfo::for_file(ContainerTag::GraffitiRuntime, "GraffitiRuntime.bin");
        assert_eq!(info, ModuleInfo::new("GraffitiPlayerModule", "GraffitiPlayer"));

        let info = ModuleInfo::for_file(ContainerTag::RepetitionPools, "x_repetitionpools.bin");
        assert_eq!(info, ModuleInfo::default());

        let info = ModuleInfo::for_file(ContainerTag::EventSystem, "chant_eventsystem.bin");
        assert_eq!(info.module_type, "GraffitiPlayerModule");
    }

    #[test]
    fn test_context_modules_carry_limits() {
        let crowd = ModuleInfo::for_file(ContainerTag::ContextData, "crowd_eventsystem.bin");
        assert_eq!(crowd.module_type, "ContextModule");
        assert_eq!(crowd.name, "CrowdContextModule");
        assert_eq!(crowd.limits, Some(ContextLimits::CROWD));

        let triggers =
            ModuleInfo::for_file(ContainerTag::EventSystem, "commentary_triggers_eventsystem.bin");
        assert_eq!(triggers.name, "ContextModule");
        assert_eq!(triggers.limits.map(|l| l.max_num_contexts), Some(1200));
    }

    #[test]
    fn test_context_data_names_are_case_sensitive() {
        let info = ModuleInfo::for_file(ContainerTag::ContextData, "Crowd_EventSystem.bin");
        assert!(!info.is_known());

        let info = ModuleInfo::for_file(ContainerTag::EventSystem, "Crowd_EventSystem.bin");
        assert_eq!(info.name, "CrowdContextModule");

        let info = ModuleInfo::for_file(ContainerTag::ContextData, r"banks\crowd_eventsystem.bin");
        assert_eq!(info.limits, Some(ContextLimits::CROWD));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("a/b\\Crowd_EventSystem.bin", true), "crowd_eventsystem");
        assert_eq!(file_stem("Crowd_EventSystem.bin", false), "Crowd_EventSystem");
        assert_eq!(file_stem("dir/.bin", false), ".bin");
        assert_eq!(file_stem("noext", false), "noext");
    }

    #[test]
    fn test_format_versions() {
        assert_eq!(
            FormatVersion::for_kind(ContainerTag::Sentences),
            Some(FormatVersion::new(3, 5, 0))
        );
        assert_eq!(FormatVersion::for_kind(ContainerTag::Unknown(*b"????????")), None);
    }
}
