// Frame asset management
//
// Loads the ordered image frames that sequencers select from. Collections are
// decoded once and shared read-only between every sequencer that uses them.

mod frame;
mod handle;
mod loader;
mod manager;
mod sheet;

pub use frame::{Frame, FrameCollection};
pub use handle::CollectionId;
pub use loader::{AssetLoader, DEFAULT_EXTENSION};
pub use manager::{FrameLibrary, LibraryStats};
pub use sheet::{FrameRegion, SheetLayout};

/// Asset loading errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Asset already loaded: {0}")]
    AlreadyLoaded(String),

    #[error("Failed to decode {name}: {reason}")]
    Decode { name: String, reason: String },

    #[error("Invalid sheet layout: {0}")]
    InvalidLayout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
