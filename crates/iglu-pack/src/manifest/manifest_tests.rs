#![allow(non_snake_case)]

use super::*;
use std::fs;
use tempfile::TempDir;
use test_case::test_case;

const DEMO_MANIFEST: &str = r#"
ID = "demo"
NAME = "Demo Plugin"
AUTHOR = "Jane Doe"
VERSION = "1.0.0"
"#;

fn manifest_with_id(id: &str) -> PluginManifest {
    PluginManifest {
        id: id.to_string(),
        name: "Demo".to_string(),
        author: "Jane Doe".to_string(),
        version: "1.0.0".to_string(),
    }
}

// Manifest parsing tests

#[test]
fn PluginManifest___parse___reads_uppercase_keys() {
    let manifest = PluginManifest::parse(DEMO_MANIFEST).unwrap();

    assert_eq!(manifest.id, "demo");
    assert_eq!(manifest.name, "Demo Plugin");
    assert_eq!(manifest.author, "Jane Doe");
    assert_eq!(manifest.version, "1.0.0");
}

#[test]
fn PluginManifest___parse___missing_keys_default_to_empty() {
    let manifest = PluginManifest::parse("ID = \"only-id\"").unwrap();

    assert_eq!(manifest.id, "only-id");
    assert!(manifest.name.is_empty());
    assert!(manifest.author.is_empty());
    assert!(manifest.version.is_empty());
}

#[test]
fn PluginManifest___parse___rejects_invalid_toml() {
    assert!(PluginManifest::parse("ID = ").is_err());
}

#[test]
fn PluginManifest___parse___rejects_non_string_values() {
    assert!(PluginManifest::parse("ID = 42").is_err());
}

// Manifest loading tests

#[test]
fn load_manifest___reads_plugin_toml_from_source_dir() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("plugin.toml"), DEMO_MANIFEST).unwrap();

    let manifest = load_manifest(temp_dir.path()).unwrap();

    assert_eq!(manifest.id, "demo");
}

#[test]
fn load_manifest___missing_file___returns_unreadable() {
    let temp_dir = TempDir::new().unwrap();

    let err = load_manifest(temp_dir.path()).unwrap_err();

    match err {
        PackError::ManifestUnreadable { path, .. } => {
            assert_eq!(path, temp_dir.path().join("plugin.toml"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn load_manifest___malformed_file___returns_unreadable() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("plugin.toml"), "ID = [").unwrap();

    let err = load_manifest(temp_dir.path()).unwrap_err();

    assert!(matches!(err, PackError::ManifestUnreadable { .. }));
}

#[test]
fn PluginManifest___reload_from___keeps_previous_fields_on_failure() {
    let temp_dir = TempDir::new().unwrap();
    let mut manifest = manifest_with_id("previous");

    let result = manifest.reload_from(temp_dir.path());

    assert!(result.is_err());
    assert_eq!(manifest, manifest_with_id("previous"));
}

#[test]
fn PluginManifest___reload_from___replaces_fields_on_success() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("plugin.toml"), DEMO_MANIFEST).unwrap();
    let mut manifest = PluginManifest::default();

    manifest.reload_from(temp_dir.path()).unwrap();

    assert_eq!(manifest.id, "demo");
    assert_eq!(manifest.version, "1.0.0");
}

// Manifest validation tests

#[test]
fn PluginManifest___validate___accepts_plain_id() {
    assert!(manifest_with_id("demo-plugin_2").validate().is_ok());
}

#[test]
fn PluginManifest___validate___accepts_dotted_id() {
    assert!(manifest_with_id("demo.v2").validate().is_ok());
}

#[test_case(""; "empty")]
#[test_case("a/b"; "forward slash")]
#[test_case("a\\b"; "backslash")]
#[test_case(".."; "parent reference")]
#[test_case("."; "current directory")]
#[test_case("my plugin"; "space")]
#[test_case("tab\tid"; "tab")]
fn PluginManifest___validate___rejects_unsafe_id(id: &str) {
    let err = manifest_with_id(id).validate().unwrap_err();

    assert!(matches!(err, PackError::InvalidManifest(_)));
}
