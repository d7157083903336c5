// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(String),
    Dir,
}

/// In-memory filesystem for tests.
///
/// Clones share state, so a test can keep one handle and give another to the
/// plugin, then inspect which files were touched.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    touched: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, implicitly creating its parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            entries
                .entry(ancestor.to_path_buf())
                .or_insert(MockEntry::Dir);
        }
        entries.insert(path.to_path_buf(), MockEntry::File(content.into()));
    }

    /// Paths passed to a successful `touch`, in call order.
    pub fn touched(&self) -> Vec<PathBuf> {
        self.touched.lock().unwrap().clone()
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let entries = self.entries.lock().unwrap();
        match entries.get(path) {
            Some(MockEntry::File(content)) => Ok(content.clone()),
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.entries.lock().unwrap().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entries.lock().unwrap().get(path), Some(MockEntry::Dir))
    }

    fn touch(&self, path: &Path) -> Result<()> {
        match self.entries.lock().unwrap().get(path) {
            Some(MockEntry::File(_)) => {
                self.touched.lock().unwrap().push(path.to_path_buf());
                Ok(())
            }
            Some(MockEntry::Dir) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_file_creates_parent_dirs() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/app/assets/app.css", "@tailwind base;");
        assert!(fs.is_dir(Path::new("/proj/app")));
        assert!(fs.is_dir(Path::new("/")));
        assert_eq!(
            fs.read_to_string(Path::new("/proj/app/assets/app.css")).unwrap(),
            "@tailwind base;"
        );
    }

    #[test]
    fn touch_requires_an_existing_file() {
        let fs = MockFileSystem::new();
        fs.add_file("/proj/a.css", "");
        assert!(fs.touch(Path::new("/proj/a.css")).is_ok());
        assert!(fs.touch(Path::new("/proj/missing.css")).is_err());
        assert_eq!(fs.touched(), vec![PathBuf::from("/proj/a.css")]);
    }
}
