//! Tifo - FIFA asset container decoding library.
//!
//! This crate provides a unified interface to the Tifo crates for working
//! with the binary containers shipped in FIFA game data.
//!
//! # Crates
//!
//! - [`tifo_common`] - Binary cursor, writer and offset table resolution
//! - [`tifo_audio`] - Audio framework bins (event systems, sentences, graffiti, repetition pools)
//! - [`tifo_crowd`] - Crowd seat placement files (`CRWD`)
//! - [`tifo_rx3`] - RX3 model sections (bone names)
//!
//! # Example
//!
//! ```no_run
//! use tifo::prelude::*;
//!
//! let crowd = CrowdFile::load("crowd_1.dat")?;
//! println!("{} seats, version {}", crowd.num_seats(), crowd.version());
//!
//! let bin = AudioBinFile::parse(&std::fs::read("crowd_eventsystem.bin")?)?;
//! if let Some(events) = bin.document.as_event_system() {
//!     for parameter in events.sorted_parameters() {
//!         println!("{} = {}", parameter.id, parameter.name);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use tifo_audio as audio;
pub use tifo_common as common;
pub use tifo_crowd as crowd;
pub use tifo_rx3 as rx3;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tifo_audio::{
        parse_many, AudioBinFile, AudioDocument, ContainerTag, CrossReference, EventSystemFile,
        GraffitiRuntimeFile, ModuleInfo, RepetitionPoolsFile, SentencesFile, Siblings,
    };
    pub use tifo_common::{BinaryReader, BinaryWriter, OffsetBase, OffsetTable};
    pub use tifo_crowd::{CrowdFile, CrowdSeats, CrowdVersion};
    pub use tifo_rx3::BoneName;
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
