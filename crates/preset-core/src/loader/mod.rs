//! The module loading seam.
//!
//! The engine never imports anything itself; it asks a [`ModuleLoader`] to
//! turn a specifier into a [`ContributorModule`] and to probe whether a
//! specifier exists at all.

mod fs;
mod registry;

pub use fs::FsModuleLoader;
pub use registry::ModuleRegistry;

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;
use crate::module::ContributorModule;

/// Where a specifier resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePath {
    pub path: String,
    /// Found inside a dependency directory rather than by path
    pub within_dependency: bool,
}

impl ModulePath {
    pub fn new(path: impl Into<String>, within_dependency: bool) -> Self {
        Self {
            path: path.into(),
            within_dependency,
        }
    }
}

/// Resolves specifiers to contributor modules.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Load and classify the module a specifier names.
    async fn load(&self, specifier: &str) -> Result<ContributorModule>;

    /// Probe whether `specifier` resolves from `parent`, without loading it.
    fn try_resolve(&self, specifier: &str, parent: &Path) -> Option<ModulePath>;
}
