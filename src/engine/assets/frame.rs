// Decoded frames and the ordered collections sequencers select from

use super::handle::CollectionId;
use glam::Vec2;
use image::RgbaImage;

/// A single decoded animation frame
#[derive(Debug, Clone)]
pub struct Frame {
    /// Resource name, `prefix + index` (e.g. "Run_3")
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// UV rectangle within the source image (full image for per-file frames)
    pub uv_min: Vec2,
    pub uv_max: Vec2,
    /// RGBA pixels
    pub image: RgbaImage,
}

impl Frame {
    /// Wrap a decoded image covering its whole source
    pub fn from_image(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            width: image.width(),
            height: image.height(),
            uv_min: Vec2::ZERO,
            uv_max: Vec2::ONE,
            image,
        }
    }

    /// A transparent frame, used for placeholder collections
    pub fn blank(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self::from_image(name, RgbaImage::new(width, height))
    }
}

/// Ordered frames `prefix0 .. prefix{n-1}` loaded from one source
///
/// Immutable once built; share it between sequencers behind an `Arc`.
#[derive(Debug, Clone)]
pub struct FrameCollection {
    id: CollectionId,
    folder: String,
    prefix: String,
    frames: Vec<Frame>,
}

impl FrameCollection {
    pub fn new(folder: &str, prefix: &str, frames: Vec<Frame>) -> Self {
        Self {
            id: CollectionId::from_source(folder, prefix),
            folder: folder.to_string(),
            prefix: prefix.to_string(),
            frames,
        }
    }

    /// Build a collection of `count` blank frames named `prefix{i}`
    pub fn placeholder(prefix: &str, count: usize) -> Self {
        let frames = (0..count)
            .map(|i| Frame::blank(frame_name(prefix, i), 1, 1))
            .collect();
        Self::new("", prefix, frames)
    }

    pub fn id(&self) -> CollectionId {
        self.id
    }

    /// Folder the frames were loaded from
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Name prefix shared by all frames
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at `index`, if it was loaded
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

/// Resource name of frame `index` in a collection with `prefix`
pub fn frame_name(prefix: &str, index: usize) -> String {
    format!("{prefix}{index}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_names() {
        assert_eq!(frame_name("Run_", 0), "Run_0");
        assert_eq!(frame_name("Walk_", 12), "Walk_12");
    }

    #[test]
    fn test_placeholder_collection() {
        let frames = FrameCollection::placeholder("Jump_", 3);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames.prefix(), "Jump_");
        assert_eq!(frames.get(2).map(|f| f.name.as_str()), Some("Jump_2"));
        assert!(frames.get(3).is_none());
    }

    #[test]
    fn test_frame_from_image_covers_source() {
        let frame = Frame::from_image("Idle_0", RgbaImage::new(16, 8));
        assert_eq!((frame.width, frame.height), (16, 8));
        assert_eq!(frame.uv_min, Vec2::ZERO);
        assert_eq!(frame.uv_max, Vec2::ONE);
    }

    #[test]
    fn test_collection_id_matches_source() {
        let frames = FrameCollection::new("Data/Assets/Running", "Run_", Vec::new());
        assert_eq!(
            frames.id(),
            CollectionId::from_source("Data/Assets/Running", "Run_")
        );
        assert!(frames.is_empty());
    }
}
