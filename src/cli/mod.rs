//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `show <path>` | Load and display an item |
//! | `flags <path>` | Combined, deduplicated flag set |
//! | `export <path>` | Item as a current-schema descriptor |
//! | `version <a> [b]` | Parse or compare version strings |
//! | `scan [root]` | Load every item under an archive |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Logging
//!
//! Diagnostics go to stderr through `tracing`. `RUST_LOG` overrides the
//! level; `--verbose` raises the default from `warn` to `debug`.

mod app;
mod item;
mod output;
mod version;

pub use app::{run, Cli, Commands};
pub use output::Output;
