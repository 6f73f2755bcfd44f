//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use entigen_core::application::ApplicationError;
use entigen_core::application::ports::Filesystem;
use entigen_core::error::EntigenResult;

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut files: Vec<_> = inner.files.keys().cloned().collect();
        files.sort();
        files
    }

    /// Clear all contents.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner.files.clear();
        inner.directories.clear();
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> EntigenResult<()> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> EntigenResult<()> {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                let mut current = PathBuf::new();
                for component in parent.components() {
                    current.push(component);
                    inner.directories.insert(current.clone());
                }
            }
        }
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> EntigenResult<String> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "No such file".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.files.contains_key(path) || inner.directories.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_same_store() {
        let fs = MemoryFilesystem::new();
        let other = fs.clone();

        fs.write_file(Path::new("/app/pom.xml"), "<project/>").unwrap();

        assert_eq!(other.read_file(Path::new("/app/pom.xml")).unwrap(), "<project/>");
        assert!(other.exists(Path::new("/app")));
    }

    #[test]
    fn list_files_is_sorted() {
        let fs = MemoryFilesystem::new();
        fs.write_file(Path::new("/b.txt"), "").unwrap();
        fs.write_file(Path::new("/a.txt"), "").unwrap();
        assert_eq!(
            fs.list_files(),
            vec![PathBuf::from("/a.txt"), PathBuf::from("/b.txt")]
        );
    }
}
