//! Archive traversal
//!
//! Walks an archive root and loads every item whose meta file is found.
//! A broken item is reported alongside the others rather than stopping the scan.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::loader::{ItemLoader, Loaded};
use crate::domain::ItemError;
use crate::paths;

/// Outcome of loading one meta file during a scan
#[derive(Debug)]
pub struct ScanEntry {
    pub meta_path: PathBuf,
    pub result: Result<Loaded, ItemError>,
}

/// A directory tree of items
#[derive(Debug)]
pub struct Archive {
    root: PathBuf,
    loader: ItemLoader,
}

impl Archive {
    /// Opens an archive rooted at `root`
    pub fn open(root: impl AsRef<Path>, loader: ItemLoader) -> Result<Self, ItemError> {
        let root = paths::canonicalize(root);
        let exists = paths::path_exists(&root, false).map_err(|e| ItemError::io(&root, e))?;
        if !exists || !root.is_dir() {
            return Err(ItemError::not_found(root, "Archive root does not exist"));
        }
        Ok(Self { root, loader })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths of every meta file under the root, sorted
    pub fn meta_files(&self) -> Vec<PathBuf> {
        let meta_filename = self.loader.config().meta_filename.as_str();

        WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable archive entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && entry.file_name() == meta_filename)
            .map(|entry| entry.into_path())
            .collect()
    }

    /// Loads every item under the root
    pub fn scan(&self) -> Vec<ScanEntry> {
        self.meta_files()
            .into_iter()
            .map(|meta_path| {
                let result = self.loader.load_from_directory(&meta_path);
                if let Err(e) = &result {
                    tracing::debug!(meta = %meta_path.display(), error = %e, "item failed to load");
                }
                ScanEntry { meta_path, result }
            })
            .collect()
    }
}
