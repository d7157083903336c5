// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use filetime::FileTime;

pub mod mock;

/// Abstract filesystem interface.
///
/// Only what the plugin needs: reading bundles for the `patch` command,
/// checking watch directories, and bumping the companion file's timestamps.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Set both access and modification time of an existing file to now.
    ///
    /// Fails if the file does not exist; nothing is created.
    fn touch(&self, path: &Path) -> Result<()>;
}

/// Implementation that uses `std::fs` and `filetime`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn touch(&self, path: &Path) -> Result<()> {
        let now = FileTime::now();
        filetime::set_file_times(path, now, now)
            .with_context(|| format!("touching file {:?}", path))
    }
}
