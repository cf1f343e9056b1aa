//! Version inspection command

use anyhow::Result;
use serde_json::json;

use super::output::Output;
use crate::domain::VersionTag;

fn describe(version: &VersionTag) -> serde_json::Value {
    json!({
        "raw": version.raw(),
        "valid": version.is_valid(),
        "major": version.major(),
        "minor": version.minor(),
        "patch": version.patch(),
        "preRelease": version.pre_release(),
        "buildMetadata": version.build_metadata(),
        "issue": version.issue().map(|i| i.to_string()),
    })
}

fn ordering_symbol(a: &VersionTag, b: &VersionTag) -> &'static str {
    if a < b {
        "<"
    } else if a > b {
        ">"
    } else {
        "="
    }
}

/// Parses one version, or compares two
pub fn run(output: &Output, first: &str, second: Option<&str>) -> Result<()> {
    let a = VersionTag::parse(first);
    output.verbose_ctx("version", &format!("Parsed {:?} as {:?}", first, a));

    let Some(second) = second else {
        if output.is_json() {
            output.data(&describe(&a));
        } else {
            print_version(&a);
        }
        return Ok(());
    };

    let b = VersionTag::parse(second);
    let symbol = ordering_symbol(&a, &b);

    if output.is_json() {
        output.data(&json!({
            "left": describe(&a),
            "right": describe(&b),
            "ordering": symbol,
            "identical": a == b,
        }));
    } else {
        println!("{} {} {}", a, symbol, b);
        if symbol == "=" && a != b {
            println!("(same precedence, different version strings)");
        }
    }

    Ok(())
}

fn print_version(version: &VersionTag) {
    match version.issue() {
        Some(issue) => println!("{}: invalid ({})", version, issue),
        None => {
            println!("{}: valid", version);
            println!("  major:  {}", version.major().unwrap_or_default());
            println!("  minor:  {}", version.minor().unwrap_or_default());
            println!("  patch:  {}", version.patch().unwrap_or_default());
            if !version.pre_release().is_empty() {
                println!("  pre:    {}", version.pre_release());
            }
            if !version.build_metadata().is_empty() {
                println!("  build:  {}", version.build_metadata());
            }
        }
    }
}
