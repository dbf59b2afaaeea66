//! Host-level composition: core presets, the configuration, overrides.
//!
//! A configuration document names the presets and addons to load and carries
//! its own extension values:
//!
//! ```toml
//! presets = ["./local-preset.json"]
//! addons = ["addon-actions", ["addon-docs", { toc = true }]]
//! disabled_addons = ["addon-docs"]
//!
//! [options]
//! mode = "development"
//!
//! [extensions]
//! features = { legacy = false }
//! ```
//!
//! The configuration itself is loaded as a preset, so everything it pulls in
//! folds before its own `extensions`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use preset_fs::{ConfigStore, NormalizedPath};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::declaration::PresetDeclaration;
use crate::error::Result;
use crate::loader::{ModuleLoader, ModulePath};
use crate::module::{Contribution, ContributorModule, DeclarationSource, ModuleContents};
use crate::options::LoadOptions;
use crate::presets::{Presets, load_presets};

/// Session option holding the configuration directory.
pub const CONFIG_DIR_OPTION: &str = "configDir";

/// Name the configuration preset is loaded under when none is given.
pub const DEFAULT_CONFIG_NAME: &str = "<config>";

/// Parsed configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresetConfig {
    pub presets: Vec<PresetDeclaration>,
    pub addons: Vec<PresetDeclaration>,
    pub disabled_addons: Vec<String>,
    /// Whether a failing preset aborts the load (defaults to `true`)
    pub critical: Option<bool>,
    /// Session options
    pub options: Map<String, Value>,
    /// Value contributions of the configuration itself
    pub extensions: Map<String, Value>,
}

impl PresetConfig {
    /// Load a configuration document (TOML, JSON or YAML).
    pub fn load(path: &Path) -> Result<Self> {
        let config = ConfigStore::new().load(&NormalizedPath::new(path))?;
        Ok(config)
    }

    pub fn is_critical(&self) -> bool {
        self.critical.unwrap_or(true)
    }

    fn to_module(&self) -> ContributorModule {
        let mut contents = ModuleContents::new();
        if !self.presets.is_empty() {
            contents.presets = Some(DeclarationSource::List(self.presets.clone()));
        }
        if !self.addons.is_empty() {
            contents.addons = Some(DeclarationSource::List(self.addons.clone()));
        }
        for (extension, value) in &self.extensions {
            contents
                .body
                .insert(extension.clone(), Contribution::Value(value.clone()));
        }
        ContributorModule::Value(contents)
    }
}

/// Everything one top-level configuration load needs.
#[derive(Debug, Clone, Default)]
pub struct LoadAllOptions {
    pub config_dir: PathBuf,
    pub config: PresetConfig,
    /// Name the configuration is loaded under (usually its file path)
    pub config_name: Option<String>,
    /// Loaded before the configuration
    pub core_presets: Vec<PresetDeclaration>,
    /// Loaded after the configuration
    pub override_presets: Vec<PresetDeclaration>,
    /// Extra session options; the configuration's `options` win over these
    pub session: Map<String, Value>,
}

impl LoadAllOptions {
    pub fn new(config_dir: impl Into<PathBuf>, config: PresetConfig) -> Self {
        Self {
            config_dir: config_dir.into(),
            config,
            ..Self::default()
        }
    }

    /// Read the configuration file and use its absolute directory as `config_dir`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let config = PresetConfig::load(path)?;
        let path = preset_fs::absolute(path);
        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| path.clone());
        Ok(Self {
            config_name: Some(NormalizedPath::new(&path).to_string()),
            ..Self::new(config_dir, config)
        })
    }

    pub fn with_core_presets(mut self, presets: Vec<PresetDeclaration>) -> Self {
        self.core_presets = presets;
        self
    }

    pub fn with_override_presets(mut self, presets: Vec<PresetDeclaration>) -> Self {
        self.override_presets = presets;
        self
    }

    pub fn with_session(mut self, session: Map<String, Value>) -> Self {
        self.session = session;
        self
    }
}

/// Load core presets, the configuration and override presets, in that order.
pub async fn load_all_presets(loader: &dyn ModuleLoader, options: LoadAllOptions) -> Result<Presets> {
    let LoadAllOptions {
        config_dir,
        config,
        config_name,
        core_presets,
        override_presets,
        mut session,
    } = options;

    let config_name = config_name.unwrap_or_else(|| DEFAULT_CONFIG_NAME.to_string());
    session.extend(config.options.clone());
    session
        .entry(CONFIG_DIR_OPTION)
        .or_insert_with(|| Value::String(NormalizedPath::new(&config_dir).to_string()));

    let load_options = LoadOptions::new(config_dir)
        .critical(config.is_critical())
        .with_disabled_addons(config.disabled_addons.clone())
        .with_session(session);

    let overlay = ConfigOverlay {
        inner: loader,
        name: config_name.clone(),
        module: config.to_module(),
    };

    let mut declarations = core_presets;
    declarations.push(PresetDeclaration::Name(config_name));
    declarations.extend(override_presets);

    tracing::debug!(
        count = declarations.len(),
        critical = load_options.is_critical,
        "Loading all presets"
    );
    load_presets(&overlay, declarations, &load_options).await
}

/// Serves the configuration module under its name, delegating everything else.
struct ConfigOverlay<'a> {
    inner: &'a dyn ModuleLoader,
    name: String,
    module: ContributorModule,
}

#[async_trait]
impl ModuleLoader for ConfigOverlay<'_> {
    async fn load(&self, specifier: &str) -> Result<ContributorModule> {
        if specifier == self.name {
            return Ok(self.module.clone());
        }
        self.inner.load(specifier).await
    }

    fn try_resolve(&self, specifier: &str, parent: &Path) -> Option<ModulePath> {
        self.inner.try_resolve(specifier, parent)
    }
}
