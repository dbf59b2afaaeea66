//! The resolved preset list and the handle hosts fold extensions through.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::apply::fold;
use crate::declaration::PresetDeclaration;
use crate::error::Result;
use crate::loader::ModuleLoader;
use crate::module::ContributorBody;
use crate::options::LoadOptions;
use crate::tree::load_tree;

/// One contributor that survived resolution.
///
/// Its position in [`Presets::list`] is its fold order.
#[derive(Debug, Clone)]
pub struct LoadedPreset {
    pub name: String,
    pub body: Arc<ContributorBody>,
    pub options: Map<String, Value>,
}

impl LoadedPreset {
    pub fn new(name: impl Into<String>, body: ContributorBody, options: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            body: Arc::new(body),
            options,
        }
    }

    /// Serializable description of this preset (no reducers).
    pub fn summary(&self) -> PresetSummary {
        PresetSummary {
            name: self.name.clone(),
            extensions: self.body.extensions().map(String::from).collect(),
            options: self.options.clone(),
        }
    }
}

/// What `presets list --json` prints for each preset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresetSummary {
    pub name: String,
    pub extensions: Vec<String>,
    pub options: Map<String, Value>,
}

/// Read-only handle over a fully loaded preset list.
///
/// Cloning is cheap; reducers receive a clone through
/// [`CombinedOptions::presets`](crate::CombinedOptions::presets) and may
/// fold other extension points re-entrantly.
#[derive(Clone)]
pub struct Presets {
    list: Arc<[LoadedPreset]>,
    session: Arc<Map<String, Value>>,
}

impl Presets {
    pub fn new(list: Vec<LoadedPreset>, session: Map<String, Value>) -> Self {
        Self {
            list: list.into(),
            session: Arc::new(session),
        }
    }

    /// A handle with no presets; every fold returns its initial value.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Map::new())
    }

    pub fn list(&self) -> &[LoadedPreset] {
        &self.list
    }

    /// Preset names in fold order.
    pub fn names(&self) -> Vec<&str> {
        self.list.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn session(&self) -> &Map<String, Value> {
        &self.session
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Fold `extension` across every preset, in order, starting from `initial`.
    pub async fn apply(
        &self,
        extension: &str,
        initial: Value,
        args: &Map<String, Value>,
    ) -> Result<Value> {
        fold(self, extension, initial, args).await
    }

    /// Fold `extension` starting from `null` with no call arguments.
    pub async fn apply_default(&self, extension: &str) -> Result<Value> {
        self.apply(extension, Value::Null, &Map::new()).await
    }
}

impl std::fmt::Debug for Presets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presets")
            .field("names", &self.names())
            .finish_non_exhaustive()
    }
}

/// Load a declaration list into a [`Presets`] handle.
pub async fn load_presets(
    loader: &dyn ModuleLoader,
    declarations: Vec<PresetDeclaration>,
    options: &LoadOptions,
) -> Result<Presets> {
    let list = load_tree(loader, declarations, 0, options).await?;
    tracing::debug!(count = list.len(), "Preset tree loaded");
    Ok(Presets::new(list, options.session.clone()))
}
