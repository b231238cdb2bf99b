// Animation manifest: which frame sequences to load and how to time them

use super::sequencer::{FrameSequencer, SequenceConfig, SequenceKind};
use crate::engine::assets::{AssetLoader, FrameCollection, FrameLibrary, SheetLayout};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Manifest loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write manifest: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Sequence {name} has invalid frame duration {duration}")]
    InvalidDuration { name: String, duration: f32 },

    #[error("Sequence {0} is defined more than once")]
    DuplicateName(String),

    #[error("Sequence {0} uses a sprite sheet and needs an explicit frame_count")]
    MissingFrameCount(String),
}

/// Top-level manifest, usually `assets/animations.toml`
///
/// ```toml
/// asset_root = "assets"
///
/// [[sequence]]
/// name = "Run_"
/// folder = "Running"
/// frame_duration = 0.08
/// kind = "looping"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationManifest {
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,

    /// Extension of per-file frames
    #[serde(default = "default_extension")]
    pub extension: String,

    #[serde(default, rename = "sequence")]
    pub sequences: Vec<SequenceEntry>,
}

/// One `[[sequence]]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceEntry {
    pub name: String,
    /// Folder under the asset root holding the frames
    pub folder: String,
    /// Frame name prefix; defaults to the sequence name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Defaults to every contiguous frame found on disk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<usize>,
    pub frame_duration: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_delay: Option<f32>,
    #[serde(default)]
    pub kind: SequenceKind,
    /// Defaults to true for looping sequences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub looping: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_frame: Option<usize>,
    /// Slice frames from one sheet instead of numbered files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<SheetEntry>,
}

/// Sprite sheet source of a sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetEntry {
    pub file: String,
    pub frame_width: u32,
    pub frame_height: u32,
    pub columns: u32,
    #[serde(default)]
    pub padding: u32,
}

impl SheetEntry {
    pub fn layout(&self) -> SheetLayout {
        SheetLayout::new(self.frame_width, self.frame_height, self.columns).with_padding(self.padding)
    }
}

impl Default for AnimationManifest {
    fn default() -> Self {
        Self {
            asset_root: default_asset_root(),
            extension: default_extension(),
            sequences: Vec::new(),
        }
    }
}

impl AnimationManifest {
    pub fn from_toml_str(s: &str) -> Result<Self, ManifestError> {
        let manifest: Self = toml::from_str(s)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn to_toml_string(&self) -> Result<String, ManifestError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load a manifest; a relative `asset_root` is resolved against the manifest's folder
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut manifest = Self::from_toml_str(&content)?;

        if manifest.asset_root.is_relative() {
            if let Some(dir) = path.parent() {
                manifest.asset_root = dir.join(&manifest.asset_root);
            }
        }

        log::info!(
            "Loaded manifest {} with {} sequences",
            path.display(),
            manifest.sequences.len()
        );
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut seen = HashSet::new();
        for entry in &self.sequences {
            if !(entry.frame_duration > 0.0) {
                return Err(ManifestError::InvalidDuration {
                    name: entry.name.clone(),
                    duration: entry.frame_duration,
                });
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ManifestError::DuplicateName(entry.name.clone()));
            }
            if entry.sheet.is_some() && entry.frame_count.is_none() {
                return Err(ManifestError::MissingFrameCount(entry.name.clone()));
            }
        }
        Ok(())
    }

    /// Find a sequence by name
    pub fn sequence(&self, name: &str) -> Option<&SequenceEntry> {
        self.sequences.iter().find(|s| s.name == name)
    }

    /// A frame library rooted at this manifest's assets
    pub fn library(&self) -> FrameLibrary {
        FrameLibrary::with_loader(AssetLoader::new(&self.asset_root).with_extension(&self.extension))
    }

    /// Load every sequence's frames and build a stopped sequencer for each
    pub fn build_sequencers(&self, library: &mut FrameLibrary) -> anyhow::Result<Vec<FrameSequencer>> {
        let mut sequencers = Vec::with_capacity(self.sequences.len());
        for entry in &self.sequences {
            let frames = entry.load_frames(library)?;
            sequencers.push(entry.build(frames));
        }
        Ok(sequencers)
    }
}

impl SequenceEntry {
    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(&self.name)
    }

    pub fn config(&self) -> SequenceConfig {
        let mut config = SequenceConfig::new(&self.name, self.frame_duration, self.kind);
        config.frame_count = self.frame_count;
        config.initial_delay = self.initial_delay;
        if let Some(looping) = self.looping {
            config.looping = looping;
        }
        config
    }

    pub fn load_frames(&self, library: &mut FrameLibrary) -> anyhow::Result<Arc<FrameCollection>> {
        match (&self.sheet, self.frame_count) {
            (Some(sheet), Some(count)) => {
                library.load_sheet(&self.folder, &sheet.file, self.prefix(), sheet.layout(), count)
            }
            (Some(_), None) => Err(ManifestError::MissingFrameCount(self.name.clone()).into()),
            (None, Some(count)) => library.load_sequence(&self.folder, self.prefix(), count),
            (None, None) => library.load_sequence_auto(&self.folder, self.prefix()),
        }
    }

    /// Build a stopped sequencer over already loaded frames
    pub fn build(&self, frames: Arc<FrameCollection>) -> FrameSequencer {
        let mut sequencer = FrameSequencer::new(frames, self.config());
        sequencer.set_hold_frame(self.hold_frame);
        sequencer
    }
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("assets")
}

fn default_extension() -> String {
    crate::engine::assets::DEFAULT_EXTENSION.to_string()
}
