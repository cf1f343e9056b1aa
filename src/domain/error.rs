//! Errors raised while building items

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure of a single item load; nothing partial is ever returned
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("{message}: {}", path.display())]
    NotFound { path: PathBuf, message: String },

    #[error("Failed to parse meta file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid meta descriptor: {0}")]
    Validation(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ItemError {
    pub(crate) fn not_found(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ItemError::NotFound {
            path: path.into(),
            message: message.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        ItemError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns true for a missing directory, meta file, or referenced file
    pub fn is_not_found(&self) -> bool {
        matches!(self, ItemError::NotFound { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, ItemError::Parse { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ItemError::Validation(_))
    }
}
