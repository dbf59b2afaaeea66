//! In-memory module registry for presets defined in Rust.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use super::{ModuleLoader, ModulePath};
use crate::error::{Error, Result};
use crate::module::ContributorModule;

/// A map of specifier to module, optionally backed by another loader.
///
/// Besides loadable modules the registry can hold plain entries: specifiers
/// that exist (so probing finds them) but are not contributors themselves,
/// such as an addon's `manager` or `preview` file.
#[derive(Clone, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, ContributorModule>,
    entries: HashSet<String>,
    fallback: Option<Arc<dyn ModuleLoader>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delegate unknown specifiers to another loader.
    pub fn with_fallback(mut self, fallback: Arc<dyn ModuleLoader>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Register a module under a specifier, replacing any previous one.
    pub fn register(&mut self, specifier: impl Into<String>, module: impl Into<ContributorModule>) {
        self.modules.insert(specifier.into(), module.into());
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, specifier: impl Into<String>, module: impl Into<ContributorModule>) -> Self {
        self.register(specifier, module);
        self
    }

    /// Register a specifier that resolves but is not a contributor.
    pub fn register_entry(&mut self, specifier: impl Into<String>) {
        self.entries.insert(specifier.into());
    }

    /// Builder form of [`register_entry`](Self::register_entry).
    pub fn with_entry(mut self, specifier: impl Into<String>) -> Self {
        self.register_entry(specifier);
        self
    }

    pub fn contains(&self, specifier: &str) -> bool {
        self.modules.contains_key(specifier) || self.entries.contains(specifier)
    }

    /// Registered module specifiers, sorted.
    pub fn specifiers(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[async_trait]
impl ModuleLoader for ModuleRegistry {
    async fn load(&self, specifier: &str) -> Result<ContributorModule> {
        if let Some(module) = self.modules.get(specifier) {
            return Ok(module.clone());
        }
        match &self.fallback {
            Some(fallback) => fallback.load(specifier).await,
            None if self.entries.contains(specifier) => Err(Error::InvalidModule {
                specifier: specifier.to_string(),
                reason: "registered as an entry point, not a preset".to_string(),
            }),
            None => Err(Error::ModuleNotFound {
                specifier: specifier.to_string(),
                base_dir: "<registry>".into(),
            }),
        }
    }

    fn try_resolve(&self, specifier: &str, parent: &Path) -> Option<ModulePath> {
        if self.contains(specifier) {
            return Some(ModulePath::new(specifier, false));
        }
        self.fallback
            .as_ref()
            .and_then(|fallback| fallback.try_resolve(specifier, parent))
    }
}

impl std::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.specifiers())
            .field("entries", &self.entries)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
