//! Loader for declarative contributor documents on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use preset_fs::{ConfigStore, ModuleResolver, NormalizedPath, SpecifierKind};
use serde_json::Value;

use super::{ModuleLoader, ModulePath};
use crate::error::{Error, Result};
use crate::module::ContributorModule;

/// Loads `.toml`, `.json`, `.yaml` and `.yml` contributor documents.
///
/// Specifiers are resolved from `base_dir`. Relative declaration names inside
/// a document are rebased onto the document's own directory, so nested
/// presets can refer to their neighbours with `./`.
#[derive(Debug, Clone)]
pub struct FsModuleLoader {
    base_dir: PathBuf,
    resolver: ModuleResolver,
    store: ConfigStore,
}

impl FsModuleLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            resolver: ModuleResolver::new(),
            store: ConfigStore::new(),
        }
    }

    /// Use a resolver with a different packages directory.
    pub fn with_resolver(mut self, resolver: ModuleResolver) -> Self {
        self.resolver = resolver;
        self
    }
}

impl FsModuleLoader {
    fn load_blocking(&self, specifier: &str) -> Result<ContributorModule> {
        let resolution = self
            .resolver
            .resolve(specifier, &self.base_dir)
            .ok_or_else(|| Error::ModuleNotFound {
                specifier: specifier.to_string(),
                base_dir: self.base_dir.clone(),
            })?;
        tracing::debug!(specifier, path = %resolution.path, "Loading preset document");

        let document: Value = self.store.load(&resolution.path)?;
        let module = ContributorModule::from_document(specifier, document)?;

        let Some(document_dir) = resolution.path.parent() else {
            return Ok(module);
        };
        Ok(module.map_declaration_names(|name| rebase(name, &document_dir)))
    }
}

#[async_trait]
impl ModuleLoader for FsModuleLoader {
    /// Probing and reading run on the Tokio blocking pool so sibling
    /// declarations load concurrently. Must be called inside a Tokio runtime.
    async fn load(&self, specifier: &str) -> Result<ContributorModule> {
        let loader = self.clone();
        let owned = specifier.to_string();
        tokio::task::spawn_blocking(move || loader.load_blocking(&owned))
            .await
            .map_err(|e| Error::LoadTask {
                specifier: specifier.to_string(),
                message: e.to_string(),
            })?
    }

    fn try_resolve(&self, specifier: &str, parent: &Path) -> Option<ModulePath> {
        self.resolver
            .resolve(specifier, parent)
            .map(|resolution| ModulePath::new(resolution.path.to_string(), resolution.within_dependency))
    }
}

fn rebase(name: &str, document_dir: &NormalizedPath) -> Option<String> {
    if SpecifierKind::of(name) != Some(SpecifierKind::Relative) {
        return None;
    }
    let relative = name.strip_prefix("./").unwrap_or(name);
    Some(document_dir.join(relative).to_string())
}
