// Central cache of decoded frame collections

use super::frame::{frame_name, Frame, FrameCollection};
use super::sheet::SheetLayout;
use super::{AssetError, AssetLoader, CollectionId};
use anyhow::Result;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Owns every loaded frame collection
///
/// Sequencers hold `Arc` clones; the library never mutates a collection after
/// it has been handed out.
pub struct FrameLibrary {
    loader: AssetLoader,
    collections: HashMap<CollectionId, Arc<FrameCollection>>,
}

impl FrameLibrary {
    /// Create a new library rooted at `asset_path`
    pub fn new<P: AsRef<Path>>(asset_path: P) -> Self {
        Self::with_loader(AssetLoader::new(asset_path))
    }

    pub fn with_loader(loader: AssetLoader) -> Self {
        Self {
            loader,
            collections: HashMap::new(),
        }
    }

    /// Load `folder/prefix0 .. prefix{count-1}` from individual image files
    ///
    /// Returns the cached collection if this folder and prefix were already loaded.
    pub fn load_sequence(
        &mut self,
        folder: &str,
        prefix: &str,
        count: usize,
    ) -> Result<Arc<FrameCollection>> {
        let id = CollectionId::from_source(folder, prefix);
        if let Some(frames) = self.collections.get(&id) {
            return Ok(Arc::clone(frames));
        }

        let mut frames = Vec::with_capacity(count);
        for index in 0..count {
            let path = self.loader.frame_path(folder, prefix, index);
            let bytes = self.loader.load_bytes(&path)?;
            let name = frame_name(prefix, index);
            let image = decode(&name, &bytes)?;
            frames.push(Frame::from_image(name, image));
        }

        log::info!("Loaded {} frames for {}{}*", count, folder_label(folder), prefix);
        Ok(self.insert(FrameCollection::new(folder, prefix, frames)))
    }

    /// Load every contiguous frame `prefix0, prefix1, ..` found on disk
    pub fn load_sequence_auto(&mut self, folder: &str, prefix: &str) -> Result<Arc<FrameCollection>> {
        let count = self.loader.count_frames(folder, prefix);
        if count == 0 {
            let first = self.loader.frame_path(folder, prefix, 0);
            return Err(AssetError::NotFound(first.to_string_lossy().to_string()).into());
        }
        self.load_sequence(folder, prefix, count)
    }

    /// Slice `count` frames out of a single sprite sheet file
    ///
    /// Frames are named `prefix{i}` like per-file frames so both sources are
    /// interchangeable for a sequencer.
    pub fn load_sheet(
        &mut self,
        folder: &str,
        file: &str,
        prefix: &str,
        layout: SheetLayout,
        count: usize,
    ) -> Result<Arc<FrameCollection>> {
        let id = CollectionId::from_source(folder, prefix);
        if let Some(frames) = self.collections.get(&id) {
            return Ok(Arc::clone(frames));
        }

        layout.validate()?;
        let path = self.loader.resolve_path(folder, file);
        let bytes = self.loader.load_bytes(&path)?;
        let sheet = decode(file, &bytes)?;
        let (sheet_width, sheet_height) = sheet.dimensions();

        let capacity = layout.capacity(sheet_width, sheet_height);
        if count > capacity {
            return Err(AssetError::InvalidLayout(format!(
                "{file} holds {capacity} frames, {count} requested"
            ))
            .into());
        }

        let mut frames = Vec::with_capacity(count);
        for index in 0..count {
            let region = layout
                .region(index, sheet_width, sheet_height)
                .ok_or_else(|| AssetError::InvalidLayout(format!("frame {index} outside {file}")))?;
            let image =
                image::imageops::crop_imm(&sheet, region.x, region.y, region.width, region.height)
                    .to_image();

            let mut frame = Frame::from_image(frame_name(prefix, index), image);
            frame.uv_min = region.uv_min;
            frame.uv_max = region.uv_max;
            frames.push(frame);
        }

        log::info!("Sliced {} frames from {}{}", count, folder_label(folder), file);
        Ok(self.insert(FrameCollection::new(folder, prefix, frames)))
    }

    /// Register frames built in memory
    pub fn add_collection(&mut self, collection: FrameCollection) -> Result<Arc<FrameCollection>> {
        if self.collections.contains_key(&collection.id()) {
            return Err(AssetError::AlreadyLoaded(format!(
                "{}{}",
                folder_label(collection.folder()),
                collection.prefix()
            ))
            .into());
        }
        Ok(self.insert(collection))
    }

    /// Get a loaded collection
    pub fn get(&self, id: CollectionId) -> Option<Arc<FrameCollection>> {
        self.collections.get(&id).cloned()
    }

    /// Drop the library's reference; sequencers still holding it keep it alive
    pub fn unload(&mut self, id: CollectionId) -> bool {
        self.collections.remove(&id).is_some()
    }

    /// Get statistics about loaded frames
    pub fn stats(&self) -> LibraryStats {
        LibraryStats {
            collection_count: self.collections.len(),
            frame_count: self.collections.values().map(|c| c.len()).sum(),
        }
    }

    /// Get the asset loader
    pub fn loader(&self) -> &AssetLoader {
        &self.loader
    }

    fn insert(&mut self, collection: FrameCollection) -> Arc<FrameCollection> {
        let frames = Arc::new(collection);
        self.collections.insert(frames.id(), Arc::clone(&frames));
        frames
    }
}

/// Statistics about loaded frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryStats {
    pub collection_count: usize,
    pub frame_count: usize,
}

fn decode(name: &str, bytes: &[u8]) -> Result<image::RgbaImage> {
    let image = image::load_from_memory(bytes).map_err(|e| AssetError::Decode {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(image.to_rgba8())
}

fn folder_label(folder: &str) -> String {
    if folder.is_empty() {
        String::new()
    } else {
        format!("{folder}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;

    fn write_frames(root: &Path, folder: &str, prefix: &str, count: u32) {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        for i in 0..count {
            let img = RgbaImage::from_pixel(4, 4, Rgba([i as u8 * 10, 0, 0, 255]));
            img.save(dir.join(format!("{prefix}{i}.png"))).unwrap();
        }
    }

    #[test]
    fn test_load_sequence_from_files() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), "Running", "Run_", 4);

        let mut library = FrameLibrary::new(dir.path());
        let frames = library.load_sequence("Running", "Run_", 4).unwrap();

        assert_eq!(frames.len(), 4);
        assert_eq!(frames.get(3).unwrap().name, "Run_3");
        assert_eq!(frames.get(2).unwrap().image.get_pixel(0, 0), &Rgba([20, 0, 0, 255]));
    }

    #[test]
    fn test_repeat_load_shares_collection() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), "Running", "Run_", 2);

        let mut library = FrameLibrary::new(dir.path());
        let first = library.load_sequence("Running", "Run_", 2).unwrap();
        let second = library.load_sequence("Running", "Run_", 2).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            library.stats(),
            LibraryStats {
                collection_count: 1,
                frame_count: 2
            }
        );
    }

    #[test]
    fn test_missing_frame_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), "Jumping", "Jump_", 2);

        let mut library = FrameLibrary::new(dir.path());
        let err = library.load_sequence("Jumping", "Jump_", 3).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssetError>(),
            Some(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_sequence_auto_counts_frames() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), "Idle", "Idle_", 5);

        let mut library = FrameLibrary::new(dir.path());
        let frames = library.load_sequence_auto("Idle", "Idle_").unwrap();
        assert_eq!(frames.len(), 5);

        assert!(library.load_sequence_auto("Idle", "Nope_").is_err());
    }

    #[test]
    fn test_load_sheet_slices_frames() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Sheets")).unwrap();
        let mut sheet = RgbaImage::new(16, 8);
        for x in 8..16 {
            for y in 0..8 {
                sheet.put_pixel(x, y, Rgba([0, 255, 0, 255]));
            }
        }
        sheet.save(dir.path().join("Sheets/walk.png")).unwrap();

        let mut library = FrameLibrary::new(dir.path());
        let frames = library
            .load_sheet("Sheets", "walk.png", "Walk_", SheetLayout::new(8, 8, 2), 2)
            .unwrap();

        assert_eq!(frames.len(), 2);
        let second = frames.get(1).unwrap();
        assert_eq!(second.name, "Walk_1");
        assert_eq!((second.width, second.height), (8, 8));
        assert_eq!(second.image.get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
        assert_eq!(second.uv_min.x, 0.5);
    }

    #[test]
    fn test_sheet_too_small_for_count() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Sheets")).unwrap();
        RgbaImage::new(16, 8)
            .save(dir.path().join("Sheets/hit.png"))
            .unwrap();

        let mut library = FrameLibrary::new(dir.path());
        let err = library
            .load_sheet("Sheets", "hit.png", "Hit_", SheetLayout::new(8, 8, 2), 3)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssetError>(),
            Some(AssetError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_add_collection_rejects_duplicates() {
        let mut library = FrameLibrary::new(".");
        library
            .add_collection(FrameCollection::placeholder("Run_", 4))
            .unwrap();

        let err = library
            .add_collection(FrameCollection::placeholder("Run_", 4))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssetError>(),
            Some(AssetError::AlreadyLoaded(_))
        ));
    }

    #[test]
    fn test_unload_keeps_shared_frames_alive() {
        let mut library = FrameLibrary::new(".");
        let frames = library
            .add_collection(FrameCollection::placeholder("Duck_", 2))
            .unwrap();

        assert!(library.unload(frames.id()));
        assert!(library.get(frames.id()).is_none());
        assert_eq!(frames.len(), 2);
    }
}
