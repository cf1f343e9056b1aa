//! Domain models for archive items
//!
//! Contains the item model and version handling. The only I/O here is the
//! existence check made when an item or related file is built.

pub mod defaults;
mod error;
mod item;
mod version;

pub use error::ItemError;
pub use item::{Item, ItemFields, RelatedFile};
pub use version::{VersionIssue, VersionTag, CURRENT_VERSION};
