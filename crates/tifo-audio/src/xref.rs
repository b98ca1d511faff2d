//! Cross-document id resolution.
//!
//! Sentences refer to repetition pools and event parameters by numeric id.
//! The documents are decoded independently, so these links are resolved on
//! demand against whichever sibling documents the caller has at hand.
//! Lookups scan in document order and return the first match; a miss
//! resolves to an empty name.

use std::fmt;

use crate::event_system::EventSystemFile;
use crate::repetition::RepetitionPoolsFile;

/// A numeric link into a sibling document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CrossReference {
    /// A pool id in a repetition pools document.
    RepetitionPool(i32),
    /// A parameter id in an event system document.
    EventParameter(i32),
}

impl CrossReference {
    pub fn id(self) -> i32 {
        match self {
            Self::RepetitionPool(id) | Self::EventParameter(id) => id,
        }
    }
}

impl fmt::Display for CrossReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RepetitionPool(id) => write!(f, "repetition pool {id}"),
            Self::EventParameter(id) => write!(f, "event parameter {id}"),
        }
    }
}

/// Name of the first pool with `id`, or `""`.
pub fn repetition_pool_name(id: i32, pools: Option<&RepetitionPoolsFile>) -> &str {
    pools
        .and_then(|doc| doc.pool(id))
        .map_or("", |pool| pool.name.as_str())
}

/// Name of the first event parameter with `id`, or `""`.
pub fn event_parameter_name(id: i32, events: Option<&EventSystemFile>) -> &str {
    events
        .and_then(|doc| doc.parameter(id))
        .map_or("", |parameter| parameter.name.as_str())
}

/// The sibling documents available for resolving a sentences document.
///
/// Holds borrows only; nothing is cached between lookups.
#[derive(Debug, Clone, Copy, Default)]
pub struct Siblings<'d> {
    pub repetition_pools: Option<&'d RepetitionPoolsFile>,
    pub event_system: Option<&'d EventSystemFile>,
}

impl<'d> Siblings<'d> {
    pub fn new(
        repetition_pools: Option<&'d RepetitionPoolsFile>,
        event_system: Option<&'d EventSystemFile>,
    ) -> Self {
        Self {
            repetition_pools,
            event_system,
        }
    }

    /// Resolve a reference to a name, or `""` when it cannot be found.
    pub fn resolve(&self, reference: CrossReference) -> &'d str {
        let name = match reference {
            CrossReference::RepetitionPool(id) => repetition_pool_name(id, self.repetition_pools),
            CrossReference::EventParameter(id) => event_parameter_name(id, self.event_system),
        };
        if name.is_empty() {
            tracing::trace!(%reference, "unresolved cross-reference");
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event_system::tests::{build as build_events, TestParameter};
    use crate::repetition::tests::build as build_pools;

    #[test]
    fn test_repetition_pool_lookup() {
        let data = build_pools(&[(b"0MIT", 7, 4, "Crowd_Roar"), (b"0ESU", 7, 1, "Shadowed")]);
        let pools = RepetitionPoolsFile::parse(&data).unwrap();

        assert_eq!(repetition_pool_name(7, Some(&pools)), "Crowd_Roar");
        assert_eq!(repetition_pool_name(99, Some(&pools)), "");
        assert_eq!(repetition_pool_name(7, None), "");
    }

    #[test]
    fn test_event_parameter_lookup() {
        let data = build_events(
            "Goal",
            &[TestParameter {
                kind: 3,
                id: 5,
                name: "Foo",
                values: &[],
            }],
        );
        let events = EventSystemFile::parse(&data).unwrap();

        assert_eq!(event_parameter_name(5, Some(&events)), "Foo");
        assert_eq!(event_parameter_name(6, Some(&events)), "");
    }

    #[test]
    fn test_siblings_resolve() {
        let data = build_pools(&[(b"0FHS", 7, 2, "Crowd_Roar")]);
        let pools = RepetitionPoolsFile::parse(&data).unwrap();
        let siblings = Siblings::new(Some(&pools), None);

        assert_eq!(siblings.resolve(CrossReference::RepetitionPool(7)), "Crowd_Roar");
        assert_eq!(siblings.resolve(CrossReference::RepetitionPool(99)), "");
        assert_eq!(siblings.resolve(CrossReference::EventParameter(7)), "");
        assert_eq!(CrossReference::EventParameter(7).id(), 7);
    }
}
