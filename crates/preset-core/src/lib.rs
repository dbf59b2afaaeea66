//! Preset composition engine
//!
//! Turns a list of preset declarations into a flat, ordered list of
//! contributors and folds named extension points across them:
//!
//! - **Addon resolution**: classifies an addon specifier as a preset module or
//!   a virtual bundle of conventional `preset`/`manager`/`preview` entries
//! - **Tree loading**: expands declarations recursively and concurrently into
//!   a pre-order list (children before parents, siblings in declaration order)
//! - **Extension folding**: reduces one extension point across the list, with
//!   reducers that may fold other extension points re-entrantly
//!
//! # Architecture
//!
//! ```text
//!                 presets CLI / host
//!                        |
//!               config (load_all_presets)
//!                        |
//!          tree  ----  addon  ----  apply
//!                        |
//!           loader (ModuleLoader seam)
//!                        |
//!                     preset-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use preset_core::{LoadOptions, ModuleContents, ModuleRegistry, load_presets};
//! use serde_json::json;
//!
//! let registry = ModuleRegistry::new()
//!     .with("base", ModuleContents::new().value("features", json!({ "a": true })));
//! let presets = load_presets(&registry, vec!["base".into()], &LoadOptions::new(".")).await?;
//! let features = presets.apply("features", json!({}), &Default::default()).await?;
//! ```

pub mod addon;
pub mod apply;
pub mod config;
pub mod declaration;
pub mod error;
pub mod loader;
pub mod module;
pub mod options;
pub mod presets;
pub mod tree;

pub use addon::{MANAGER_ENTRIES, PREVIEW_ANNOTATIONS, ResolvedAddon, VirtualAddon, resolve_addon};
pub use apply::merge_values;
pub use config::{CONFIG_DIR_OPTION, LoadAllOptions, PresetConfig, load_all_presets};
pub use declaration::PresetDeclaration;
pub use error::{Error, Result};
pub use loader::{FsModuleLoader, ModuleLoader, ModulePath, ModuleRegistry};
pub use module::{
    Contribution, ContributorBody, ContributorModule, DeclarationSource, Expanded, ModuleContents,
    ModuleFactory, Reducer, ReducerContext,
};
pub use options::{CombinedOptions, LoadOptions};
pub use presets::{LoadedPreset, PresetSummary, Presets, load_presets};
pub use tree::load_tree;
