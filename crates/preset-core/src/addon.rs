//! Convention-based addon discovery.
//!
//! An addon is named by a bare specifier. It is either a preset module in its
//! own right, or a package exposing up to three conventional entry points next
//! to each other: `<name>/preset`, `<name>/manager` and `<name>/preview`. The
//! latter is turned into a virtual bundle that contributes its UI entries to
//! the [`MANAGER_ENTRIES`] and [`PREVIEW_ANNOTATIONS`] extension points.

use std::path::Path;

use preset_fs::{EntryRole, NormalizedPath};
use serde_json::{Map, Value};

use crate::declaration::PresetDeclaration;
use crate::error::{Error, Result};
use crate::loader::{ModuleLoader, ModulePath};
use crate::module::{Contribution, DeclarationSource, ModuleContents};

/// Extension point collecting UI-registration entries.
pub const MANAGER_ENTRIES: &str = "managerEntries";

/// Extension point collecting runtime-annotation entries.
pub const PREVIEW_ANNOTATIONS: &str = "previewAnnotations";

/// File stems that name a UI-registration entry when referenced directly.
const MANAGER_STEMS: [&str; 2] = ["manager", "register"];

/// A bundle of conventional sibling entry points.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualAddon {
    /// The specifier the bundle was discovered from
    pub name: String,
    /// Build-time preset entry, carrying the addon's options
    pub preset: Option<Box<PresetDeclaration>>,
    /// UI-registration entry path
    pub manager: Option<String>,
    /// Runtime-annotation entry path
    pub preview: Option<String>,
}

impl VirtualAddon {
    /// The contributor this bundle stands for.
    pub(crate) fn into_contents(self) -> ModuleContents {
        let mut contents = ModuleContents::new();
        if let Some(preset) = self.preset {
            contents.presets = Some(DeclarationSource::List(vec![*preset]));
        }
        if let Some(manager) = self.manager {
            contents.body.insert(
                MANAGER_ENTRIES,
                Contribution::Value(Value::Array(vec![Value::String(manager)])),
            );
        }
        if let Some(preview) = self.preview {
            contents.body.insert(
                PREVIEW_ANNOTATIONS,
                Contribution::Value(Value::Array(vec![Value::String(preview)])),
            );
        }
        contents
    }
}

/// Classification of an addon specifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedAddon {
    /// The specifier is itself a preset module
    Direct { path: String },
    /// The specifier names a package of conventional entry points
    Virtual(VirtualAddon),
}

impl ResolvedAddon {
    /// Turn the classification into a declaration the tree loader can expand.
    pub fn into_declaration(self, options: Map<String, Value>) -> PresetDeclaration {
        match self {
            Self::Direct { path } if options.is_empty() => PresetDeclaration::Name(path),
            Self::Direct { path } => PresetDeclaration::with_options(path, options),
            Self::Virtual(addon) => PresetDeclaration::Virtual(addon),
        }
    }
}

/// Classify `specifier` as resolved from `base_dir`.
///
/// `Ok(None)` means nothing was found, which is not an error. `Err` is only
/// returned for specifiers that cannot be probed at all.
pub fn resolve_addon(
    loader: &dyn ModuleLoader,
    base_dir: &Path,
    specifier: &str,
    options: &Map<String, Value>,
) -> Result<Option<ResolvedAddon>> {
    let specifier = specifier.trim();
    if specifier.is_empty() {
        return Err(Error::InvalidSpecifier {
            specifier: specifier.to_string(),
            reason: "addon name is empty".to_string(),
        });
    }

    let direct = loader.try_resolve(specifier, base_dir);
    let direct_stem = direct
        .as_ref()
        .and_then(|resolved| NormalizedPath::new(&resolved.path).file_stem().map(String::from));

    if let (Some(resolved), Some(stem)) = (&direct, direct_stem.as_deref()) {
        if stem == EntryRole::Preset.as_str() {
            tracing::debug!(addon = specifier, path = %resolved.path, "Addon is a preset module");
            return Ok(Some(ResolvedAddon::Direct {
                path: resolved.path.clone(),
            }));
        }
        if MANAGER_STEMS.contains(&stem) {
            tracing::debug!(addon = specifier, path = %resolved.path, "Addon is a manager entry");
            return Ok(Some(ResolvedAddon::Virtual(VirtualAddon {
                name: specifier.to_string(),
                preset: None,
                manager: Some(entry_path(specifier, resolved)),
                preview: None,
            })));
        }
    }

    let probe = |role: EntryRole| {
        let sibling = role.sibling_of(specifier);
        loader
            .try_resolve(&sibling, base_dir)
            .map(|resolved| (sibling, resolved))
    };
    let preset = probe(EntryRole::Preset);
    let manager = probe(EntryRole::Manager);
    let preview = probe(EntryRole::Preview);

    if preset.is_some() || manager.is_some() || preview.is_some() {
        let addon = VirtualAddon {
            name: specifier.to_string(),
            preset: preset.map(|(_, resolved)| {
                Box::new(PresetDeclaration::with_options(resolved.path, options.clone()))
            }),
            manager: manager.map(|(sibling, resolved)| entry_path(&sibling, &resolved)),
            preview: preview.map(|(sibling, resolved)| entry_path(&sibling, &resolved)),
        };
        tracing::debug!(
            addon = specifier,
            preset = addon.preset.is_some(),
            manager = addon.manager.is_some(),
            preview = addon.preview.is_some(),
            "Addon resolved to a virtual bundle"
        );
        return Ok(Some(ResolvedAddon::Virtual(addon)));
    }

    Ok(direct.map(|resolved| {
        tracing::debug!(addon = specifier, path = %resolved.path, "Addon resolved directly");
        ResolvedAddon::Direct {
            path: resolved.path,
        }
    }))
}

/// Package-relative inside a dependency tree, absolute otherwise.
fn entry_path(specifier: &str, resolved: &ModulePath) -> String {
    if resolved.within_dependency {
        specifier.to_string()
    } else {
        resolved.path.clone()
    }
}
