//! End-to-end loading of the `site` fixture
//!
//! Exercises the whole flow against test-fixtures/workspaces/site:
//! configuration -> preset tree -> addon discovery -> extension folding.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use preset_core::{
    CONFIG_DIR_OPTION, FsModuleLoader, LoadAllOptions, MANAGER_ENTRIES, PREVIEW_ANNOTATIONS,
    PresetConfig, Presets, load_all_presets,
};
use serde_json::{Map, json};

/// Path to the test-fixtures directory (relative to the workspace root).
fn fixtures_dir() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // tests/integration -> ../../test-fixtures
    manifest_dir.join("../../test-fixtures")
}

fn site_config() -> PathBuf {
    fixtures_dir().join("workspaces/site/presets.toml")
}

async fn load_site() -> Presets {
    let options = LoadAllOptions::from_file(&site_config()).unwrap();
    let loader = FsModuleLoader::new(options.config_dir.clone());
    load_all_presets(&loader, options).await.unwrap()
}

// ==========================================================================
// Fixture validity
// ==========================================================================

#[test]
fn test_site_config_parses() {
    let config = PresetConfig::load(&site_config()).unwrap();

    assert_eq!(config.presets.len(), 1);
    assert_eq!(config.addons.len(), 5);
    assert_eq!(config.disabled_addons, vec!["addon-legacy"]);
    assert!(config.is_critical());
    assert_eq!(config.options.get("mode"), Some(&json!("development")));
}

// ==========================================================================
// Tree shape
// ==========================================================================

#[tokio::test]
async fn test_site_fold_order() {
    let presets = load_site().await;
    let names = presets.names();

    assert_eq!(names.len(), 8, "unexpected preset list: {names:?}");
    assert!(names[0].ends_with("presets/theme.yaml"));
    assert_eq!(names[1], "./presets/base.json");
    assert_eq!(names[2], "addon-essentials/presets/actions");
    assert_eq!(names[3], "addon-essentials/presets/controls");
    assert!(names[4].ends_with("packages/addon-docs/preset.json"));
    assert_eq!(names[5], "addon-docs");
    assert_eq!(names[6], "addon-viewport/register");
    assert!(names[7].ends_with("presets.toml"));
}

#[tokio::test]
async fn test_disabled_and_missing_addons_are_skipped() {
    let presets = load_site().await;

    assert!(presets.names().iter().all(|name| !name.contains("addon-legacy")));
    assert!(presets.names().iter().all(|name| !name.contains("addon-not-installed")));
}

#[tokio::test]
async fn test_addon_options_reach_virtual_preset() {
    let presets = load_site().await;

    let docs_preset = presets
        .list()
        .iter()
        .find(|p| p.name.ends_with("addon-docs/preset.json"))
        .unwrap();
    assert_eq!(docs_preset.options.get("toc"), Some(&json!(true)));
}

// ==========================================================================
// Folding
// ==========================================================================

#[tokio::test]
async fn test_features_merge_across_tree() {
    let presets = load_site().await;

    assert_eq!(
        presets.apply("features", json!({}), &Map::new()).await.unwrap(),
        json!({
            "base": true,
            "actions": true,
            "controls": true,
            "docs": true,
            "storyStoreV7": true
        })
    );
}

#[tokio::test]
async fn test_children_fold_before_parent() {
    let presets = load_site().await;

    assert_eq!(
        presets.apply("core", json!({}), &Map::new()).await.unwrap(),
        json!({ "theme": "light", "builder": "default" })
    );
    assert_eq!(
        presets.apply("staticDirs", json!([]), &Map::new()).await.unwrap(),
        json!(["./public"])
    );
}

#[tokio::test]
async fn test_ui_entries_collected_in_order() {
    let presets = load_site().await;

    assert_eq!(
        presets.apply(MANAGER_ENTRIES, json!([]), &Map::new()).await.unwrap(),
        json!([
            "addon-essentials/actions-manager",
            "addon-docs/manager",
            "addon-viewport/register"
        ])
    );
    assert_eq!(
        presets.apply(PREVIEW_ANNOTATIONS, json!([]), &Map::new()).await.unwrap(),
        json!(["addon-docs/preview"])
    );
}

#[tokio::test]
async fn test_session_carries_config_options() {
    let presets = load_site().await;

    assert_eq!(presets.session().get("mode"), Some(&json!("development")));
    assert!(presets.session().contains_key(CONFIG_DIR_OPTION));
}
