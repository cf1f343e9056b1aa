//! Filesystem helpers shared by the item model and the loader
//!
//! - [`path_exists`] checks (and optionally creates) a path
//! - [`canonicalize`] expands `~` and resolves `.`/`..` lexically
//! - [`slugify`] folds text into an ASCII tag
//! - [`resolve_flags`] derives tags from a directory's path segments

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use directories::BaseDirs;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("slug pattern is valid"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-\s]+").expect("slug pattern is valid"));

/// Returns whether `path` exists, creating it as a directory tree if asked
///
/// A missing path is `Ok(false)`; errors other than not-found (permissions,
/// a file where a directory was expected) are returned.
pub fn path_exists(path: &Path, create: bool) -> io::Result<bool> {
    if path.try_exists()? {
        return Ok(true);
    }

    if create {
        fs::create_dir_all(path)?;
        return Ok(true);
    }

    Ok(false)
}

/// Returns an absolute, lexically normalized path
///
/// A leading `~` expands to the home directory. Relative paths are joined to
/// the current directory. Symlinks are left alone.
pub fn canonicalize(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    let expanded = match path.strip_prefix("~") {
        Ok(rest) => match BaseDirs::new() {
            Some(dirs) => dirs.home_dir().join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    };

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(expanded),
            Err(_) => expanded,
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Converts text into a lowercase, hyphen-separated ASCII slug
///
/// `"Hëllö Wörld!"` becomes `"hello-world"`.
pub fn slugify(text: &str) -> String {
    let folded: String = text.nfkd().filter(char::is_ascii).collect();
    let lowered = folded.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, "");
    let joined = SEPARATORS.replace_all(&stripped, "-");
    joined.trim_matches(|c: char| c == '-' || c == '_').to_string()
}

/// Derives tags from each segment of `dir`, root excluded, in path order
///
/// Segments that slugify to nothing are skipped.
pub fn resolve_flags(dir: &Path) -> Vec<String> {
    dir.components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(slugify(&segment.to_string_lossy())),
            _ => None,
        })
        .filter(|slug| !slug.is_empty())
        .collect()
}
