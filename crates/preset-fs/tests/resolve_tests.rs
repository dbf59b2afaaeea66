//! Filesystem probing tests for `ModuleResolver`

use preset_fs::{ModuleResolver, NormalizedPath};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "{}").unwrap();
}

fn canonical(root: &Path, relative: &str) -> String {
    NormalizedPath::new(dunce::canonicalize(root.join(relative)).unwrap())
        .as_str()
        .to_string()
}

#[test]
fn test_relative_specifier_with_exact_file() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "config/local.json");

    let resolution = ModuleResolver::new()
        .resolve("./local.json", &temp.path().join("config"))
        .unwrap();

    assert_eq!(resolution.path.as_str(), canonical(temp.path(), "config/local.json"));
    assert!(!resolution.within_dependency);
}

#[test]
fn test_relative_specifier_by_stem() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "local.toml");

    let resolution = ModuleResolver::new().resolve("./local", temp.path()).unwrap();

    assert_eq!(resolution.path.as_str(), canonical(temp.path(), "local.toml"));
}

#[test]
fn test_document_extension_preferred_over_other_files() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "entry.js");
    touch(temp.path(), "entry.json");

    let resolution = ModuleResolver::new().resolve("./entry", temp.path()).unwrap();

    assert_eq!(resolution.path.file_name(), Some("entry.json"));
}

#[test]
fn test_non_document_file_found_by_stem() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "packages/addon-a/manager.js");

    let resolution = ModuleResolver::new()
        .resolve("addon-a/manager", temp.path())
        .unwrap();

    assert_eq!(resolution.path.file_name(), Some("manager.js"));
    assert!(resolution.within_dependency);
}

#[test]
fn test_bare_specifier_found_in_ancestor_packages_dir() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "packages/addon-a/preset.json");
    fs::create_dir_all(temp.path().join("apps/site/.config")).unwrap();

    let resolution = ModuleResolver::new()
        .resolve("addon-a/preset", &temp.path().join("apps/site/.config"))
        .unwrap();

    assert_eq!(
        resolution.path.as_str(),
        canonical(temp.path(), "packages/addon-a/preset.json")
    );
    assert!(resolution.within_dependency);
}

#[test]
fn test_nearest_packages_dir_wins() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "packages/addon-a/preset.json");
    touch(temp.path(), "apps/site/packages/addon-a/preset.json");

    let resolution = ModuleResolver::new()
        .resolve("addon-a/preset", &temp.path().join("apps/site"))
        .unwrap();

    assert_eq!(
        resolution.path.as_str(),
        canonical(temp.path(), "apps/site/packages/addon-a/preset.json")
    );
}

#[test]
fn test_directory_resolves_to_index() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "packages/addon-b/index.yaml");

    let resolution = ModuleResolver::new().resolve("addon-b", temp.path()).unwrap();

    assert_eq!(resolution.path.file_name(), Some("index.yaml"));
}

#[test]
fn test_custom_packages_dir() {
    let temp = TempDir::new().unwrap();
    touch(temp.path(), "vendor/addon-c/preset.json");

    let default = ModuleResolver::new().resolve("addon-c/preset", temp.path());
    let custom = ModuleResolver::new()
        .with_packages_dir("vendor")
        .resolve("addon-c/preset", temp.path());

    assert!(default.is_none());
    assert!(custom.is_some());
}

#[test]
fn test_missing_specifier_is_none() {
    let temp = TempDir::new().unwrap();

    assert!(ModuleResolver::new().resolve("nope", temp.path()).is_none());
    assert!(ModuleResolver::new().resolve("./nope", temp.path()).is_none());
    assert!(ModuleResolver::new().resolve("", temp.path()).is_none());
}
