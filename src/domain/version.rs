//! Semantic version tags for meta descriptors
//!
//! Version strings follow `MAJOR.MINOR.PATCH[-PRERELEASE][+BUILD]` with an
//! optional leading `v` (e.g. `2.0.0`, `v1.0.3`, `2.1.5-rc.1+build.123`).
//!
//! Parsing never fails: malformed input yields a tag with `is_valid() == false`
//! so callers can decide whether an unreadable version is fatal.
//!
//! Ordering compares `(major, minor, patch)` only. Equality compares the raw
//! string, so `2.1.5-rc.1` and `2.1.5` are neither equal nor ordered apart.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Schema version written by this library
pub const CURRENT_VERSION: &str = "2.0.0";

/// Grammar from semver.org, restricted to ASCII digits
const SEMVER_PATTERN: &str = r"(?m)^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)(?:-((?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$";

static SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SEMVER_PATTERN).expect("semver pattern is valid"));

/// Why a version string was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionIssue {
    /// The declared value was not a JSON string
    NotAString,
    /// No digit anywhere in the input
    NoDigits,
    /// Digits present but the grammar did not match
    NoMatch,
    /// A numeric component does not fit in a `u64`
    OutOfRange,
}

impl fmt::Display for VersionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionIssue::NotAString => write!(f, "version is not a string"),
            VersionIssue::NoDigits => write!(f, "no numbers in version string"),
            VersionIssue::NoMatch => write!(f, "not a semantic version"),
            VersionIssue::OutOfRange => write!(f, "version number out of range"),
        }
    }
}

/// A parsed semantic version string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct VersionTag {
    raw: String,
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre_release: String,
    build_metadata: String,
    issue: Option<VersionIssue>,
    multiple_matches: bool,
}

impl VersionTag {
    /// Parses a version string, stripping one leading `v`/`V`
    pub fn parse(s: &str) -> Self {
        let raw = s
            .strip_prefix('v')
            .or_else(|| s.strip_prefix('V'))
            .unwrap_or(s)
            .to_string();

        if raw.trim().is_empty() || !raw.chars().any(|c| c.is_ascii_digit()) {
            tracing::debug!(version = %raw, "no numbers in version string");
            return Self::invalid(raw, VersionIssue::NoDigits);
        }

        let mut matches = SEMVER.captures_iter(&raw);
        let Some(caps) = matches.next() else {
            tracing::debug!(version = %raw, "no semantic version match");
            return Self::invalid(raw, VersionIssue::NoMatch);
        };

        let multiple_matches = matches.next().is_some();
        if multiple_matches {
            tracing::warn!(
                version = %raw,
                "multiple version matches found; keeping the first"
            );
        }

        let number = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse::<u64>().ok());
        let text = |idx: usize| caps.get(idx).map(|m| m.as_str().to_string()).unwrap_or_default();

        let (major, minor, patch) = (number(1), number(2), number(3));
        let pre_release = text(4);
        let build_metadata = text(5);

        let issue = if major.is_none() || minor.is_none() || patch.is_none() {
            Some(VersionIssue::OutOfRange)
        } else {
            None
        };

        Self {
            raw,
            major,
            minor,
            patch,
            pre_release,
            build_metadata,
            issue,
            multiple_matches,
        }
    }

    /// Builds a tag from a JSON value; anything but a string is invalid
    pub fn from_value(value: &serde_json::Value) -> Self {
        match value.as_str() {
            Some(s) => Self::parse(s),
            None => {
                tracing::debug!(value = %value, "version is not a string");
                Self::invalid(value.to_string(), VersionIssue::NotAString)
            }
        }
    }

    /// The schema version this library writes
    pub fn current() -> Self {
        Self::parse(CURRENT_VERSION)
    }

    fn invalid(raw: String, issue: VersionIssue) -> Self {
        Self {
            raw,
            major: None,
            minor: None,
            patch: None,
            pre_release: String::new(),
            build_metadata: String::new(),
            issue: Some(issue),
            multiple_matches: false,
        }
    }

    /// The version string as stored (leading `v` removed)
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn major(&self) -> Option<u64> {
        self.major
    }

    pub fn minor(&self) -> Option<u64> {
        self.minor
    }

    pub fn patch(&self) -> Option<u64> {
        self.patch
    }

    /// Pre-release identifiers, empty if none
    pub fn pre_release(&self) -> &str {
        &self.pre_release
    }

    /// Build metadata, empty if none
    pub fn build_metadata(&self) -> &str {
        &self.build_metadata
    }

    pub fn is_valid(&self) -> bool {
        self.issue.is_none()
    }

    /// Why parsing failed, if it did
    pub fn issue(&self) -> Option<VersionIssue> {
        self.issue
    }

    /// True if the input held more than one version; only the first was kept
    pub fn has_multiple_matches(&self) -> bool {
        self.multiple_matches
    }

    /// The `(major, minor, patch)` tuple used for ordering
    pub fn precedence(&self) -> (Option<u64>, Option<u64>, Option<u64>) {
        (self.major, self.minor, self.patch)
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for VersionTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for VersionTag {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<VersionTag> for String {
    fn from(version: VersionTag) -> Self {
        version.raw
    }
}

impl PartialEq for VersionTag {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for VersionTag {}

impl Hash for VersionTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

// Tuple-only on purpose: pre-release and build metadata never affect ordering,
// even though they do affect equality.
impl PartialOrd for VersionTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.precedence().cmp(&other.precedence()))
    }
}
