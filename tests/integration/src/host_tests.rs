//! Host-level composition on top of on-disk presets
//!
//! A host defines its own core and override presets in Rust, layers them
//! around a configuration on disk and drives everything through `apply`.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use preset_core::{
    CONFIG_DIR_OPTION, ContributorModule, Error, Expanded, FsModuleLoader, LoadAllOptions,
    ModuleContents, ModuleRegistry, PresetConfig, PresetDeclaration, load_all_presets,
};
use preset_test_utils::TestWorkspace;
use serde_json::{Map, Value, json};

fn project() -> TestWorkspace {
    let ws = TestWorkspace::new();
    ws.write_json(
        "presets/team.json",
        &json!({ "features": { "team": true }, "framework": "react" }),
    );
    ws.write_package(
        "addon-docs",
        &[
            ("preset.json", r#"{ "features": { "docs": true } }"#),
            ("manager.js", ""),
        ],
    );
    ws.write_config(
        r#"
presets = ["./presets/team.json"]
addons = ["addon-docs"]

[options]
mode = "production"
"#,
    );
    ws
}

/// Host registry: Rust-defined presets, everything else from disk.
fn host_registry(ws: &TestWorkspace) -> ModuleRegistry {
    ModuleRegistry::new()
        .with(
            "host/core",
            ModuleContents::new()
                .value("features", json!({ "core": true }))
                .sync_reducer("builder", |acc, context| {
                    let mode = context.options.get("mode").cloned().unwrap_or(Value::Null);
                    Ok(json!({ "previous": acc, "mode": mode }))
                }),
        )
        .with(
            "host/builder-options",
            ModuleContents::new().reducer("builder", |acc, context| async move {
                let presets = context
                    .options
                    .presets()
                    .cloned()
                    .ok_or_else(|| Error::contributor("folding without a presets handle"))?;
                let features = presets.apply("features", json!({}), &Map::new()).await?;
                let mut builder = acc;
                builder["docs"] = features.get("docs").cloned().unwrap_or(Value::Bool(false));
                Ok::<_, Error>(builder)
            }),
        )
        .with(
            "host/renderer",
            ContributorModule::factory(|options| {
                let renderer = options
                    .get("renderer")
                    .and_then(Value::as_str)
                    .unwrap_or("html")
                    .to_string();
                Ok(Expanded::Contents(
                    ModuleContents::new().value("renderer", json!(renderer)),
                ))
            }),
        )
        .with_fallback(Arc::new(FsModuleLoader::new(ws.root())))
}

#[tokio::test]
async fn test_core_and_override_presets_wrap_configuration() {
    let ws = project();
    let registry = host_registry(&ws);
    let options = LoadAllOptions::from_file(&ws.path("presets.toml"))
        .unwrap()
        .with_core_presets(vec!["host/core".into()])
        .with_override_presets(vec!["host/builder-options".into()]);

    let presets = load_all_presets(&registry, options).await.unwrap();

    assert_eq!(presets.names().first(), Some(&"host/core"));
    assert_eq!(presets.names().last(), Some(&"host/builder-options"));
    assert_eq!(
        presets.apply("features", json!({}), &Map::new()).await.unwrap(),
        json!({ "core": true, "team": true, "docs": true })
    );
    assert_eq!(
        presets.apply("builder", json!("initial"), &Map::new()).await.unwrap(),
        json!({ "previous": "initial", "mode": "production", "docs": true })
    );
}

#[tokio::test]
async fn test_call_args_override_session_options() {
    let ws = project();
    let registry = host_registry(&ws);
    let options = LoadAllOptions::from_file(&ws.path("presets.toml"))
        .unwrap()
        .with_core_presets(vec!["host/core".into()]);
    let presets = load_all_presets(&registry, options).await.unwrap();

    let mut args = Map::new();
    args.insert("mode".into(), json!("development"));
    assert_eq!(
        presets.apply("builder", Value::Null, &args).await.unwrap(),
        json!({ "previous": null, "mode": "development" })
    );
}

#[tokio::test]
async fn test_two_pass_bootstrap_is_host_policy() {
    let ws = project();
    let registry = host_registry(&ws);

    // First pass: discover the framework from the configuration alone.
    let discovery = load_all_presets(
        &registry,
        LoadAllOptions::from_file(&ws.path("presets.toml")).unwrap(),
    )
    .await
    .unwrap();
    let framework = discovery.apply_default("framework").await.unwrap();
    assert_eq!(framework, json!("react"));

    // Second pass: inject the renderer preset the first pass asked for.
    let mut renderer_options = Map::new();
    renderer_options.insert("renderer".into(), framework);
    let presets = load_all_presets(
        &registry,
        LoadAllOptions::from_file(&ws.path("presets.toml"))
            .unwrap()
            .with_core_presets(vec![PresetDeclaration::with_options(
                "host/renderer",
                renderer_options,
            )]),
    )
    .await
    .unwrap();

    assert_eq!(presets.apply_default("renderer").await.unwrap(), json!("react"));
    assert_eq!(presets.len(), discovery.len() + 1);
}

#[tokio::test]
async fn test_config_without_file_uses_given_directory() {
    let ws = project();
    let config: PresetConfig = serde_json::from_value(json!({
        "presets": ["./presets/team.json"],
        "critical": false,
        "extensions": { "features": { "inline": true } }
    }))
    .unwrap();
    let loader = FsModuleLoader::new(ws.root());

    let presets = load_all_presets(&loader, LoadAllOptions::new(ws.root(), config))
        .await
        .unwrap();

    assert_eq!(presets.len(), 2);
    assert_eq!(
        presets.apply("features", json!({}), &Map::new()).await.unwrap(),
        json!({ "team": true, "inline": true })
    );
    assert!(presets.session().contains_key(CONFIG_DIR_OPTION));
}

#[tokio::test]
async fn test_broken_core_preset_aborts_critical_load() {
    let ws = project();
    let registry = host_registry(&ws).with(
        "host/broken",
        ContributorModule::factory(|_| Err(Error::contributor("renderer unavailable"))),
    );
    let options = LoadAllOptions::from_file(&ws.path("presets.toml"))
        .unwrap()
        .with_core_presets(vec!["host/broken".into(), "host/core".into()]);

    let err = load_all_presets(&registry, options).await.unwrap_err();

    assert!(matches!(err, Error::PresetLoad { ref name, depth: 0, .. } if name == "host/broken"));
    assert!(err.to_string().contains("renderer unavailable"));
}
