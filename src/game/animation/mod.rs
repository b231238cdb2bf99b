// Sprite animation
//
// This module contains the single-sequence frame timing primitive and the
// pieces that feed and drive it:
// - FrameSequencer, the per-tick frame advance state machine
// - Manifest describing which sequences to load
// - SequenceSystem, which advances every sequencer once per tick

pub mod manifest;
pub mod sequencer;
pub mod system;

pub use manifest::{AnimationManifest, ManifestError, SequenceEntry, SheetEntry};
pub use sequencer::{FrameSequencer, SequenceConfig, SequenceKind, Tick};
pub use system::SequenceSystem;

/// Errors surfaced by a sequencer while it keeps playing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("Sequence {sequence} has no frame {index} ({available} loaded)")]
    MissingFrame {
        sequence: String,
        index: usize,
        available: usize,
    },
}
