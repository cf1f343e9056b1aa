//! Fallback values for fields a meta descriptor leaves out

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_AUTHOR: &str = "Anonymous";
/// Dates are free-form, normally `YYYY-MM-DD`
pub const DEFAULT_DATE: &str = "Undated";
pub const DEFAULT_DESCRIPTION: &str = "An empty item.";

pub const DEFAULT_RELATED_LABEL: &str = "Untitled";
pub const DEFAULT_RELATED_DESCRIPTION: &str = "";

/// File name looked up when a directory is given instead of a meta file
pub const DEFAULT_META_FILENAME: &str = "meta.json";
