//! Item domain model
//!
//! An item is one archived document: a directory holding a source file,
//! optional related files, and a `meta.json` descriptor. Items are immutable
//! once built; every referenced file is checked at construction.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use super::defaults::{DEFAULT_AUTHOR, DEFAULT_DATE, DEFAULT_DESCRIPTION, DEFAULT_TITLE};
use super::error::ItemError;
use super::version::VersionTag;
use crate::paths;

/// A secondary file attached to an item (an illustration, an appendix)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedFile {
    label: String,
    path: PathBuf,
    description: String,
    id: Option<String>,
}

impl RelatedFile {
    /// Creates a related file; fails if `path` does not exist
    pub fn new(
        label: impl Into<String>,
        path: impl AsRef<Path>,
        description: impl Into<String>,
        id: Option<String>,
    ) -> Result<Self, ItemError> {
        let label = label.into();
        let path = paths::canonicalize(path);

        if !paths::path_exists(&path, false).map_err(|e| ItemError::io(&path, e))? {
            return Err(ItemError::not_found(
                path,
                format!("Related file \"{}\" could not be found", label),
            ));
        }

        Ok(Self {
            label,
            path,
            description: description.into(),
            id,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Absolute path to the file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// JSON form with an absolute path
    pub fn to_json(&self) -> Value {
        self.to_json_within(None)
    }

    fn to_json_within(&self, directory: Option<&Path>) -> Value {
        json!({
            "label": self.label,
            "path": display_path(&self.path, directory),
            "description": self.description,
            "id": self.id,
        })
    }
}

impl fmt::Display for RelatedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.label, self.path.display())
    }
}

/// Everything needed to build an [`Item`]
///
/// `Default` fills in the documented fallbacks and leaves optional fields unset.
#[derive(Debug, Clone)]
pub struct ItemFields {
    pub version: Option<VersionTag>,
    pub title: String,
    pub author: String,
    pub date: String,
    pub description: String,
    pub directory: Option<PathBuf>,
    pub source_file: Option<PathBuf>,
    pub related_files: Option<Vec<RelatedFile>>,
    pub meta_filepath: Option<PathBuf>,
    pub classification: Option<String>,
    pub flags: Option<Vec<String>>,
    pub resolved_flags: Option<Vec<String>>,
}

impl Default for ItemFields {
    fn default() -> Self {
        Self {
            version: None,
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            date: DEFAULT_DATE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            directory: None,
            source_file: None,
            related_files: None,
            meta_filepath: None,
            classification: None,
            flags: None,
            resolved_flags: None,
        }
    }
}

/// A normalized archive item
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    version: Option<VersionTag>,
    title: String,
    author: String,
    date: String,
    description: String,
    directory: Option<PathBuf>,
    source_file: Option<PathBuf>,
    related_files: Option<Vec<RelatedFile>>,
    meta_filepath: Option<PathBuf>,
    classification: Option<String>,
    flags: Option<Vec<String>>,
    resolved_flags: Option<Vec<String>>,
}

impl Item {
    /// Builds an item, making paths absolute and checking the source file exists
    pub fn new(fields: ItemFields) -> Result<Self, ItemError> {
        let source_file = match fields.source_file {
            Some(path) => {
                let path = paths::canonicalize(path);
                let exists =
                    paths::path_exists(&path, false).map_err(|e| ItemError::io(&path, e))?;
                if !exists || !path.is_file() {
                    return Err(ItemError::not_found(path, "Source file could not be found"));
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            version: fields.version,
            title: fields.title,
            author: fields.author,
            date: fields.date,
            description: fields.description,
            directory: fields.directory.map(paths::canonicalize),
            source_file,
            related_files: fields.related_files,
            meta_filepath: fields.meta_filepath.map(paths::canonicalize),
            classification: fields.classification,
            flags: fields.flags,
            resolved_flags: fields.resolved_flags,
        })
    }

    /// Reads the declared `_infover` of a descriptor
    pub fn version_from_json(data: &Value) -> Result<VersionTag, ItemError> {
        data.get("_infover")
            .map(VersionTag::from_value)
            .ok_or_else(|| ItemError::Validation("no declared version (_infover)".to_string()))
    }

    pub fn version(&self) -> Option<&VersionTag> {
        self.version.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// Free-form date string
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    pub fn related_files(&self) -> Option<&[RelatedFile]> {
        self.related_files.as_deref()
    }

    pub fn meta_filepath(&self) -> Option<&Path> {
        self.meta_filepath.as_deref()
    }

    pub fn classification(&self) -> Option<&str> {
        self.classification.as_deref()
    }

    /// User-declared flags
    pub fn flags(&self) -> Option<&[String]> {
        self.flags.as_deref()
    }

    /// Flags derived from the item's directory path
    pub fn resolved_flags(&self) -> Option<&[String]> {
        self.resolved_flags.as_deref()
    }

    /// Declared flags, resolved flags and the classification, deduplicated and sorted
    pub fn get_all_flags(&self) -> BTreeSet<String> {
        let mut all = BTreeSet::new();

        all.extend(self.flags.iter().flatten().cloned());
        all.extend(self.resolved_flags.iter().flatten().cloned());
        all.extend(self.classification.iter().cloned());

        all
    }

    /// Maps the item back to the v2 descriptor schema
    ///
    /// Paths under the item directory are written relative to it.
    pub fn to_json(&self) -> Value {
        let dir = self.directory.as_deref();
        let mut map = Map::new();

        let version = self
            .version
            .as_ref()
            .map(|v| v.raw().to_string())
            .unwrap_or_else(|| VersionTag::current().raw().to_string());

        map.insert("_infover".to_string(), Value::String(version));
        map.insert("title".to_string(), Value::String(self.title.clone()));
        map.insert("author".to_string(), Value::String(self.author.clone()));
        map.insert("date".to_string(), Value::String(self.date.clone()));
        map.insert("description".to_string(), Value::String(self.description.clone()));

        if let Some(classification) = &self.classification {
            map.insert("classification".to_string(), Value::String(classification.clone()));
        }
        if let Some(source) = &self.source_file {
            map.insert("sourceFile".to_string(), Value::String(display_path(source, dir)));
        }
        if let Some(related) = &self.related_files {
            let files = related.iter().map(|f| f.to_json_within(dir)).collect();
            map.insert("otherFiles".to_string(), Value::Array(files));
        }
        if let Some(flags) = &self.flags {
            map.insert("flags".to_string(), json!(flags));
        }

        Value::Object(map)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} ({})", self.title, self.author, self.date)
    }
}

fn display_path(path: &Path, directory: Option<&Path>) -> String {
    directory
        .and_then(|dir| path.strip_prefix(dir).ok())
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}
