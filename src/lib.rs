//! libalex - metadata for a personal document archive
//!
//! Each archived item is a directory holding a source document, optional
//! related files, and a versioned `meta.json` descriptor. This crate loads
//! descriptors of any supported schema version into one normalized [`Item`].

pub mod domain;
pub mod paths;
pub mod storage;
pub mod cli;

pub use domain::{Item, ItemError, RelatedFile, VersionTag};
pub use storage::{Archive, ItemLoader, Loaded};
