//! # Storage Layer
//!
//! Reads items from an on-disk archive. Nothing here writes to the archive.
//!
//! ## Item Layout
//!
//! ```text
//! archive/
//! └── poetry/
//!     └── limericks/
//!         ├── meta.json         # Descriptor (schema v1 or v2)
//!         ├── sourceFile.txt    # Primary document
//!         └── relatedFile.txt   # Related files listed in `otherFiles`
//! ```
//!
//! ## Schema Versions
//!
//! | Major | Status | Handling |
//! |-------|--------|----------|
//! | 2 | Current | Loaded as-is |
//! | 1 | Deprecated | `content` renamed to `sourceFile`, then loaded as v2 |
//!
//! ## Key Types
//!
//! - [`ItemLoader`] - Builds items from meta files or parsed JSON
//! - [`Archive`] - Scans a directory tree for items
//! - [`Config`] - User configuration

mod archive;
mod config;
mod loader;

pub use archive::{Archive, ScanEntry};
pub use config::{Config, ConfigError, OutputFormat};
pub use loader::{ItemLoader, LoadWarning, Loaded, LoaderConfig};
