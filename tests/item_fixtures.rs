//! Loader tests against hand-authored v1 and v2 meta descriptors
//!
//! Each test lays out an item directory with a source file, two related
//! files, and both descriptor versions, then loads it through the public API.

use std::fs;
use std::path::Path;

use libalex::domain::CURRENT_VERSION;
use libalex::paths;
use libalex::{ItemLoader, VersionTag};
use serde_json::{json, Value};
use tempfile::TempDir;

const META_V1: &str = r#"{
    "_infover": "1.0.0",
    "classification": "AS",
    "title": "Lorem Ipsum",
    "author": "John Doe",
    "date": "1984-04-01",
    "content": "sourceFile.txt",
    "flags": ["text", "prose", "example", "libalexandria", "test"],
    "description": "A test item."
}"#;

const META_V2: &str = r#"{
    "_infover": "2.0.0",
    "classification": "AS",
    "title": "Lorem Ipsum",
    "author": "John Doe",
    "date": "1984-04-01",
    "sourceFile": "sourceFile.txt",
    "otherFiles": [
        {
            "label": "A Limerick",
            "path": "relatedFile.txt",
            "description": "A Limerick for testing purposes.",
            "id": "limerick"
        },
        {
            "label": "A Haiku",
            "path": "relatedFile2.txt",
            "description": "A Haiku for testing purposes.",
            "id": "haiku"
        }
    ],
    "flags": ["text", "prose", "example", "libalexandria", "test"],
    "description": "A test item."
}"#;

/// Creates `<tmp>/assets` with source, related files and both descriptors
fn setup_assets() -> (TempDir, std::path::PathBuf) {
    let tmp = TempDir::new().unwrap();
    let assets = tmp.path().join("assets");
    fs::create_dir_all(&assets).unwrap();

    fs::write(assets.join("sourceFile.txt"), "Lorem ipsum dolor sit amet.").unwrap();
    fs::write(assets.join("relatedFile.txt"), "There once was a test from Nantucket").unwrap();
    fs::write(assets.join("relatedFile2.txt"), "An old silent pond").unwrap();
    fs::write(assets.join("metaV1.json"), META_V1).unwrap();
    fs::write(assets.join("metaV2.json"), META_V2).unwrap();

    (tmp, assets)
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn loads_v2_meta_file() {
    let (_tmp, assets) = setup_assets();
    let loaded = ItemLoader::new()
        .load_from_directory(assets.join("metaV2.json"))
        .unwrap();
    let item = &loaded.item;

    assert!(loaded.warnings.is_empty());
    assert_eq!(item.version().and_then(VersionTag::major), Some(2));
    assert_eq!(item.title(), "Lorem Ipsum");
    assert_eq!(item.author(), "John Doe");
    assert_eq!(item.date(), "1984-04-01");
    assert_eq!(item.description(), "A test item.");
    assert_eq!(item.classification(), Some("AS"));
    assert_eq!(item.directory(), Some(paths::canonicalize(&assets).as_path()));
    assert_eq!(
        item.source_file(),
        Some(paths::canonicalize(assets.join("sourceFile.txt")).as_path())
    );
    assert_eq!(
        item.meta_filepath(),
        Some(paths::canonicalize(assets.join("metaV2.json")).as_path())
    );
    assert!(item.resolved_flags().is_some_and(|f| f.contains(&"assets".to_string())));

    let labels: Vec<_> = item
        .related_files()
        .unwrap()
        .iter()
        .map(|f| f.label())
        .collect();
    assert_eq!(labels, vec!["A Limerick", "A Haiku"]);
}

#[test]
fn loads_v1_meta_file_with_deprecation() {
    let (_tmp, assets) = setup_assets();
    let loaded = ItemLoader::new()
        .load_from_directory(assets.join("metaV1.json"))
        .unwrap();
    let item = &loaded.item;

    assert!(loaded.is_deprecated());
    assert_eq!(item.version().map(VersionTag::raw), Some(CURRENT_VERSION));
    assert_eq!(item.title(), "Lorem Ipsum");
    assert_eq!(item.classification(), Some("AS"));
    assert_eq!(
        item.source_file(),
        Some(paths::canonicalize(assets.join("sourceFile.txt")).as_path())
    );
    assert!(item.related_files().is_none());
    assert!(item.resolved_flags().is_some());
}

#[test]
fn v1_and_v2_resolve_same_source() {
    let (_tmp, assets) = setup_assets();
    let loader = ItemLoader::new();

    let v1 = loader.load_from_directory(assets.join("metaV1.json")).unwrap();
    let v2 = loader.load_from_directory(assets.join("metaV2.json")).unwrap();

    assert_eq!(v1.item.source_file(), v2.item.source_file());
    assert_eq!(v1.item.flags(), v2.item.flags());
}

#[test]
fn v2_export_matches_fixture() {
    let (_tmp, assets) = setup_assets();
    let meta = assets.join("metaV2.json");
    let loaded = ItemLoader::new().load_from_directory(&meta).unwrap();

    assert_eq!(loaded.item.to_json(), read_json(&meta));
}

#[test]
fn v1_export_matches_v2_fixture_without_related_files() {
    let (_tmp, assets) = setup_assets();
    let loaded = ItemLoader::new()
        .load_from_directory(assets.join("metaV1.json"))
        .unwrap();

    let mut expected = read_json(&assets.join("metaV2.json"));
    expected.as_object_mut().unwrap().remove("otherFiles");

    assert_eq!(loaded.item.to_json(), expected);
}

#[test]
fn all_flags_merge_declared_resolved_and_classification() {
    let (_tmp, assets) = setup_assets();
    let loaded = ItemLoader::new()
        .load_from_directory(assets.join("metaV2.json"))
        .unwrap();
    let item = &loaded.item;

    let all = item.get_all_flags();
    for flag in item.flags().unwrap() {
        assert!(all.contains(flag));
    }
    for flag in item.resolved_flags().unwrap() {
        assert!(all.contains(flag));
    }
    assert!(all.contains("AS"));

    let sorted: Vec<_> = all.iter().cloned().collect();
    let mut expected = sorted.clone();
    expected.sort();
    assert_eq!(sorted, expected);
}

#[test]
fn missing_related_file_fails_whole_load() {
    let (_tmp, assets) = setup_assets();
    fs::remove_file(assets.join("relatedFile2.txt")).unwrap();

    let err = ItemLoader::new()
        .load_from_directory(assets.join("metaV2.json"))
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("A Haiku"));
}

#[test]
fn unsupported_version_leaves_directory_untouched() {
    let (_tmp, assets) = setup_assets();
    let meta = assets.join("meta.json");
    let descriptor = json!({"_infover": "3.0.0", "title": "Future"}).to_string();
    fs::write(&meta, &descriptor).unwrap();

    let before: Vec<_> = fs::read_dir(&assets).unwrap().map(|e| e.unwrap().path()).collect();
    let err = ItemLoader::new().load_from_directory(&assets).unwrap_err();
    let after: Vec<_> = fs::read_dir(&assets).unwrap().map(|e| e.unwrap().path()).collect();

    assert!(err.is_validation());
    assert_eq!(before.len(), after.len());
    assert_eq!(fs::read_to_string(&meta).unwrap(), descriptor);
}
