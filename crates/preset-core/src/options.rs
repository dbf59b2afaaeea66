//! Options threaded through loading and folding.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::presets::{LoadedPreset, Presets};

/// Settings for one top-level preset load.
///
/// Computed once and shared read-only by every branch of the tree.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Directory addon specifiers are resolved from
    pub config_dir: PathBuf,
    /// Abort the whole load on the first failing preset
    pub is_critical: bool,
    /// Addons whose name contains any of these strings are skipped
    pub disabled_addons: Vec<String>,
    /// Session-level options visible to every factory and reducer
    pub session: Map<String, Value>,
}

impl LoadOptions {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            ..Self::default()
        }
    }

    pub fn critical(mut self, is_critical: bool) -> Self {
        self.is_critical = is_critical;
        self
    }

    pub fn with_disabled_addons<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_addons = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_session(mut self, session: Map<String, Value>) -> Self {
        self.session = session;
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Whether a declaration name matches the disabled list (substring match).
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled_addons
            .iter()
            .any(|disabled| !disabled.is_empty() && name.contains(disabled.as_str()))
    }
}

/// The options record handed to factories and reducers.
///
/// Built fresh for each load or fold step: session options, then call
/// arguments, then the preset's own options, later keys winning. While
/// folding it also carries the re-entrant [`Presets`] handle.
#[derive(Debug, Clone, Default)]
pub struct CombinedOptions {
    values: Map<String, Value>,
    presets: Option<Presets>,
}

impl CombinedOptions {
    /// Options for a factory invoked while the tree is still loading.
    pub fn for_loading(session: &Map<String, Value>, preset_options: &Map<String, Value>) -> Self {
        Self {
            values: merge_layers([session, preset_options]),
            presets: None,
        }
    }

    /// Options for a reducer invoked while folding.
    pub fn for_folding(
        presets: &Presets,
        args: &Map<String, Value>,
        preset_options: &Map<String, Value>,
    ) -> Self {
        Self {
            values: merge_layers([presets.session(), args, preset_options]),
            presets: Some(presets.clone()),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Re-entrant handle over the fully loaded list. `None` while loading.
    pub fn presets(&self) -> Option<&Presets> {
        self.presets.as_ref()
    }

    /// The full flat preset list. Empty while loading.
    pub fn presets_list(&self) -> &[LoadedPreset] {
        self.presets.as_ref().map(Presets::list).unwrap_or(&[])
    }
}

fn merge_layers<'a>(layers: impl IntoIterator<Item = &'a Map<String, Value>>) -> Map<String, Value> {
    let mut merged = Map::new();
    for layer in layers {
        for (key, value) in layer {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_is_disabled_substring() {
        let options = LoadOptions::new(".").with_disabled_addons(["addon-docs", ""]);
        assert!(options.is_disabled("@scope/addon-docs"));
        assert!(options.is_disabled("addon-docs/preset"));
        assert!(!options.is_disabled("addon-actions"));
    }

    #[test]
    fn test_loading_options_preset_wins() {
        let combined = CombinedOptions::for_loading(
            &map(json!({ "mode": "dev", "shared": "session" })),
            &map(json!({ "shared": "preset" })),
        );
        assert_eq!(combined.get("mode"), Some(&json!("dev")));
        assert_eq!(combined.get("shared"), Some(&json!("preset")));
        assert!(combined.presets().is_none());
        assert!(combined.presets_list().is_empty());
    }

    #[test]
    fn test_folding_options_layer_order() {
        let presets = Presets::new(Vec::new(), map(json!({ "a": "session", "b": "session", "c": "session" })));
        let combined = CombinedOptions::for_folding(
            &presets,
            &map(json!({ "b": "args", "c": "args" })),
            &map(json!({ "c": "preset" })),
        );
        assert_eq!(combined.get("a"), Some(&json!("session")));
        assert_eq!(combined.get("b"), Some(&json!("args")));
        assert_eq!(combined.get("c"), Some(&json!("preset")));
        assert!(combined.presets().is_some());
    }
}
