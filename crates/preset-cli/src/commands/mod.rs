//! Command implementations for preset-cli

pub mod apply;
pub mod list;
pub mod resolve;

pub use apply::run_apply;
pub use list::run_list;
pub use resolve::run_resolve;

use std::path::Path;

use preset_core::{FsModuleLoader, LoadAllOptions, Presets, load_all_presets};

use crate::error::{CliError, Result};

/// Load every preset the configuration at `config` pulls in.
pub async fn load_config(config: &Path) -> Result<Presets> {
    if !config.is_file() {
        return Err(CliError::user(format!(
            "Configuration not found at {}",
            config.display()
        )));
    }

    let options = LoadAllOptions::from_file(config)?;
    let loader = FsModuleLoader::new(options.config_dir.clone());
    tracing::debug!(config = %config.display(), "Loading configuration");
    Ok(load_all_presets(&loader, options).await?)
}
