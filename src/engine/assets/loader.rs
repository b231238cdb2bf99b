// Frame file discovery and reading

use super::frame::frame_name;
use super::AssetError;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Default file extension for frame images
pub const DEFAULT_EXTENSION: &str = "png";

/// Supported frame image extensions
const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Finds and reads frame images under an asset root
///
/// Per-file frames live at `root/folder/prefix{i}.{extension}`.
pub struct AssetLoader {
    base_path: PathBuf,
    extension: String,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Use a different frame file extension
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Full path of a file inside a frame folder
    pub fn resolve_path(&self, folder: &str, file: &str) -> PathBuf {
        self.base_path.join(folder).join(file)
    }

    /// Full path of frame `index` for `prefix`
    pub fn frame_path(&self, folder: &str, prefix: &str, index: usize) -> PathBuf {
        let file = format!("{}.{}", frame_name(prefix, index), self.extension);
        self.resolve_path(folder, &file)
    }

    /// Read raw bytes from disk
    pub fn load_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()).into());
        }

        Ok(std::fs::read(path)?)
    }

    /// Check if frame `index` exists on disk
    pub fn frame_exists(&self, folder: &str, prefix: &str, index: usize) -> bool {
        self.frame_path(folder, prefix, index).exists()
    }

    /// Count the contiguous frames `prefix0, prefix1, ..` present on disk
    pub fn count_frames(&self, folder: &str, prefix: &str) -> usize {
        (0..)
            .take_while(|&i| self.frame_exists(folder, prefix, i))
            .count()
    }

    /// List the image files in a frame folder
    pub fn list_frames(&self, folder: &str) -> Result<Vec<String>> {
        let dir = self.base_path.join(folder);

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let supported = path
                .extension()
                .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_string_lossy().as_ref()))
                .unwrap_or(false);

            if let (true, Some(name)) = (supported, path.file_name()) {
                files.push(name.to_string_lossy().to_string());
            }
        }

        files.sort();
        Ok(files)
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_frame_path_resolution() {
        let loader = AssetLoader::new("/game/assets");
        let path = loader.frame_path("Running", "Run_", 3);

        assert_eq!(path, PathBuf::from("/game/assets/Running/Run_3.png"));
    }

    #[test]
    fn test_custom_extension() {
        let loader = AssetLoader::new("assets").with_extension(".jpg");
        assert_eq!(loader.extension(), "jpg");
        assert_eq!(
            loader.frame_path("Idle", "Idle_", 0),
            PathBuf::from("assets/Idle/Idle_0.jpg")
        );
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let loader = AssetLoader::new("/definitely/not/here");
        let err = loader
            .load_bytes(&loader.frame_path("Run", "Run_", 0))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssetError>(),
            Some(AssetError::NotFound(_))
        ));
    }

    #[test]
    fn test_count_and_list_frames() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("Walk");
        fs::create_dir_all(&folder).unwrap();
        for name in ["Walk_0.png", "Walk_1.png", "Walk_2.png", "Walk_4.png", "notes.txt"] {
            fs::write(folder.join(name), b"").unwrap();
        }

        let loader = AssetLoader::new(dir.path());
        // Walk_3 is missing, so only the first three are contiguous
        assert_eq!(loader.count_frames("Walk", "Walk_"), 3);

        let listed = loader.list_frames("Walk").unwrap();
        assert_eq!(listed, vec!["Walk_0.png", "Walk_1.png", "Walk_2.png", "Walk_4.png"]);
        assert!(loader.list_frames("Missing").unwrap().is_empty());
    }
}
