//! Loading items from meta descriptors
//!
//! A descriptor declares its schema in `_infover`. Each supported major
//! version has an entry in [`SCHEMAS`] that upgrades its fields to the v2
//! layout; the v2 fields are then resolved against the item directory.
//!
//! Loads are all-or-nothing: a missing source or related file fails the whole
//! item.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::domain::defaults::{
    DEFAULT_AUTHOR, DEFAULT_DATE, DEFAULT_DESCRIPTION, DEFAULT_META_FILENAME,
    DEFAULT_RELATED_DESCRIPTION, DEFAULT_RELATED_LABEL, DEFAULT_TITLE,
};
use crate::domain::{Item, ItemError, ItemFields, RelatedFile, VersionTag, CURRENT_VERSION};
use crate::paths;

/// Upgrades a descriptor's fields to the v2 layout
type Upgrade = fn(&Map<String, Value>) -> Map<String, Value>;

struct Schema {
    major: u64,
    upgrade: Upgrade,
    deprecated: bool,
}

/// Supported schema majors; new versions are added here
const SCHEMAS: &[Schema] = &[
    Schema {
        major: 2,
        upgrade: upgrade_v2,
        deprecated: false,
    },
    Schema {
        major: 1,
        upgrade: upgrade_v1,
        deprecated: true,
    },
];

/// Non-fatal conditions noticed during a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The descriptor uses a schema kept only for migration
    DeprecatedSchema { declared: String },
    /// `_infover` held more than one version; the first was used
    MultipleVersionMatches { declared: String },
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadWarning::DeprecatedSchema { declared } => write!(
                f,
                "schema version {} is deprecated; upgrade to {}",
                declared, CURRENT_VERSION
            ),
            LoadWarning::MultipleVersionMatches { declared } => write!(
                f,
                "multiple versions declared in {:?}; only the first was used",
                declared
            ),
        }
    }
}

/// A successfully loaded item plus any warnings raised on the way
#[derive(Debug, Clone)]
pub struct Loaded {
    pub item: Item,
    pub warnings: Vec<LoadWarning>,
}

impl Loaded {
    /// Returns true if the descriptor was migrated from a deprecated schema
    pub fn is_deprecated(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w, LoadWarning::DeprecatedSchema { .. }))
    }

    pub fn into_item(self) -> Item {
        self.item
    }
}

/// Loader settings
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// File name tried when a directory is passed instead of a meta file
    pub meta_filename: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            meta_filename: DEFAULT_META_FILENAME.to_string(),
        }
    }
}

/// Builds [`Item`]s from meta descriptors on disk or in memory
#[derive(Debug, Clone, Default)]
pub struct ItemLoader {
    config: LoaderConfig,
}

impl ItemLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Loads the item described by `meta_path`
    ///
    /// `meta_path` may also name the item directory, in which case the
    /// configured meta file inside it is used.
    pub fn load_from_directory(&self, meta_path: impl AsRef<Path>) -> Result<Loaded, ItemError> {
        let mut meta_path = paths::canonicalize(meta_path);

        let parent_exists = match meta_path.parent() {
            Some(parent) => exists(parent)? && parent.is_dir(),
            None => false,
        };
        if !parent_exists {
            return Err(ItemError::not_found(&meta_path, "Item directory does not exist"));
        }

        if !(exists(&meta_path)? && meta_path.is_file()) {
            let nested = meta_path.join(&self.config.meta_filename);
            if !(exists(&nested)? && nested.is_file()) {
                return Err(ItemError::not_found(&meta_path, "Meta file could not be found"));
            }
            tracing::debug!(
                from = %meta_path.display(),
                to = %nested.display(),
                "meta path is a directory, using its meta file"
            );
            meta_path = nested;
        }

        let directory = meta_dir(&meta_path);
        let resolved_flags = paths::resolve_flags(&directory);

        let content = fs::read(&meta_path).map_err(|e| ItemError::io(&meta_path, e))?;

        // Bad encoding surfaces here as a parse error, not a read error
        let data: Value = serde_json::from_slice(&content).map_err(|source| ItemError::Parse {
            path: meta_path.clone(),
            source,
        })?;

        self.load_from_json(&data, &directory, Some(&meta_path), Some(resolved_flags))
    }

    /// Builds an item from an already parsed descriptor
    ///
    /// Relative file references resolve against `directory`.
    pub fn load_from_json(
        &self,
        data: &Value,
        directory: &Path,
        meta_filepath: Option<&Path>,
        resolved_flags: Option<Vec<String>>,
    ) -> Result<Loaded, ItemError> {
        let object = data
            .as_object()
            .ok_or_else(|| ItemError::Validation("meta descriptor is not a JSON object".into()))?;

        let version = Item::version_from_json(data)?;
        let mut warnings = Vec::new();

        if version.has_multiple_matches() {
            warnings.push(LoadWarning::MultipleVersionMatches {
                declared: version.raw().to_string(),
            });
        }

        let schema = version
            .major()
            .and_then(|major| SCHEMAS.iter().find(|s| s.major == major))
            .ok_or_else(|| unsupported(&version))?;

        if schema.deprecated {
            tracing::warn!(
                version = %version,
                meta = ?meta_filepath,
                "loading deprecated schema; migrate to {}",
                CURRENT_VERSION
            );
            warnings.push(LoadWarning::DeprecatedSchema {
                declared: version.raw().to_string(),
            });
        }

        let fields = (schema.upgrade)(object);
        let directory = paths::canonicalize(directory);
        let item = build_item(&fields, &directory, meta_filepath, resolved_flags)?;

        tracing::debug!(
            title = item.title(),
            directory = %directory.display(),
            warnings = warnings.len(),
            "loaded item"
        );

        Ok(Loaded { item, warnings })
    }
}

fn unsupported(version: &VersionTag) -> ItemError {
    match version.issue() {
        Some(issue) => ItemError::Validation(format!(
            "unsupported version {:?}: {}",
            version.raw(),
            issue
        )),
        None => ItemError::Validation(format!("unsupported version {:?}", version.raw())),
    }
}

fn exists(path: &Path) -> Result<bool, ItemError> {
    paths::path_exists(path, false).map_err(|e| ItemError::io(path, e))
}

fn meta_dir(meta_path: &Path) -> PathBuf {
    meta_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| meta_path.to_path_buf())
}

fn upgrade_v2(fields: &Map<String, Value>) -> Map<String, Value> {
    fields.clone()
}

/// Renames v1 keys to their v2 names; v1 has no related files
fn upgrade_v1(fields: &Map<String, Value>) -> Map<String, Value> {
    const CARRIED: &[&str] = &["title", "author", "date", "flags", "description", "classification"];

    let mut upgraded = Map::new();
    upgraded.insert("_infover".to_string(), Value::String(CURRENT_VERSION.to_string()));

    for key in CARRIED {
        if let Some(value) = fields.get(*key) {
            upgraded.insert((*key).to_string(), value.clone());
        }
    }

    if let Some(content) = fields.get("content") {
        upgraded.insert("sourceFile".to_string(), content.clone());
    }

    upgraded
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => {
            tracing::debug!(key, value = %other, "ignoring non-string field");
            None
        }
    }
}

fn string_list(fields: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let list = fields.get(key)?.as_array()?;
    Some(
        list.iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
    )
}

fn build_item(
    fields: &Map<String, Value>,
    directory: &Path,
    meta_filepath: Option<&Path>,
    resolved_flags: Option<Vec<String>>,
) -> Result<Item, ItemError> {
    let version = fields.get("_infover").map(VersionTag::from_value);
    let source_file = string_field(fields, "sourceFile").map(|s| directory.join(s));

    let related_files = match fields.get("otherFiles").and_then(Value::as_array) {
        Some(entries) => Some(
            entries
                .iter()
                .map(|entry| related_file(entry, directory))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        None => None,
    };

    Item::new(ItemFields {
        version,
        title: string_field(fields, "title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        author: string_field(fields, "author").unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        date: string_field(fields, "date").unwrap_or_else(|| DEFAULT_DATE.to_string()),
        description: string_field(fields, "description")
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        directory: Some(directory.to_path_buf()),
        source_file,
        related_files,
        meta_filepath: meta_filepath.map(Path::to_path_buf),
        classification: string_field(fields, "classification"),
        flags: string_list(fields, "flags"),
        resolved_flags,
    })
}

fn related_file(entry: &Value, directory: &Path) -> Result<RelatedFile, ItemError> {
    let entry = entry
        .as_object()
        .ok_or_else(|| ItemError::Validation("otherFiles entries must be objects".into()))?;

    let label = string_field(entry, "label").unwrap_or_else(|| DEFAULT_RELATED_LABEL.to_string());
    let path = string_field(entry, "path").ok_or_else(|| {
        ItemError::Validation(format!("related file \"{}\" has no path", label))
    })?;
    let description = string_field(entry, "description")
        .unwrap_or_else(|| DEFAULT_RELATED_DESCRIPTION.to_string());
    let id = string_field(entry, "id");

    RelatedFile::new(label, directory.join(path), description, id)
}
