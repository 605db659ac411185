use anyhow::{Context, Result};
use std::path::Path;
#[cfg(test)]
use {
    anyhow::bail,
    std::collections::{HashMap, HashSet},
    std::path::PathBuf,
    std::sync::RwLock,
};

/// Filesystem access used by the exporters, swappable for an in-memory mock
pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Write a file, creating missing parent directories
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    fn create_dir_all(&self, path: &Path) -> Result<()>;
}

/// Filesystem backed by std::fs
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create parent directory: {:?}", parent))?;
        }

        std::fs::write(path, contents).with_context(|| format!("Failed to write file: {:?}", path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {:?}", path))
    }
}

/// In-memory filesystem for tests
#[cfg(test)]
#[derive(Default)]
pub struct MockFileSystem {
    files: RwLock<HashMap<PathBuf, String>>,
    directories: RwLock<HashSet<PathBuf>>,
    read_only: RwLock<HashSet<PathBuf>>,
}

#[cfg(test)]
impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file
    pub fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), contents.to_string());
        self
    }

    /// Make every later write to `path` fail
    pub fn deny_writes_to(&self, path: impl Into<PathBuf>) {
        self.read_only.write().unwrap().insert(path.into());
    }

    pub fn get_file_contents(&self, path: &Path) -> Option<String> {
        self.files.read().unwrap().get(path).cloned()
    }

    pub fn has_file(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.directories.read().unwrap().contains(path)
    }

    /// Written file paths, sorted
    pub fn list_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self.files.read().unwrap().keys().cloned().collect();
        files.sort();
        files
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .with_context(|| format!("File not found in mock filesystem: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if self.read_only.read().unwrap().contains(path) {
            bail!("Permission denied: {:?}", path);
        }
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }

        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut directories = self.directories.write().unwrap();
        for ancestor in path.ancestors() {
            directories.insert(ancestor.to_path_buf());
        }
        Ok(())
    }
}
