//! Recursive expansion of preset declarations into a flat, ordered list.
//!
//! Sibling declarations are loaded concurrently and joined back by position,
//! so the output order only depends on declaration order. A preset's
//! sub-presets and addons always precede the preset itself.

use futures::future::{BoxFuture, FutureExt, try_join_all};

use crate::addon::resolve_addon;
use crate::declaration::PresetDeclaration;
use crate::error::{Error, Result};
use crate::loader::ModuleLoader;
use crate::module::{ContributorModule, DeclarationSource, Expanded, ModuleContents};
use crate::options::{CombinedOptions, LoadOptions};
use crate::presets::LoadedPreset;

struct LoadContext<'a> {
    loader: &'a dyn ModuleLoader,
    options: &'a LoadOptions,
}

/// Expand `declarations` (found at `depth`) into loaded presets, in fold order.
///
/// Without `is_critical`, a declaration that fails is logged and contributes
/// nothing. With it, the first failure aborts the whole load, wrapped with the
/// failing preset's name and depth.
pub async fn load_tree(
    loader: &dyn ModuleLoader,
    declarations: Vec<PresetDeclaration>,
    depth: usize,
    options: &LoadOptions,
) -> Result<Vec<LoadedPreset>> {
    let context = LoadContext { loader, options };
    load_level(&context, declarations, depth).await
}

fn load_level<'a>(
    context: &'a LoadContext<'a>,
    declarations: Vec<PresetDeclaration>,
    depth: usize,
) -> BoxFuture<'a, Result<Vec<LoadedPreset>>> {
    async move {
        let branches = declarations
            .into_iter()
            .map(|declaration| load_declaration(context, declaration, depth));
        let loaded = try_join_all(branches).await?;
        Ok(loaded.into_iter().flatten().collect())
    }
    .boxed()
}

async fn load_declaration(
    context: &LoadContext<'_>,
    declaration: PresetDeclaration,
    depth: usize,
) -> Result<Vec<LoadedPreset>> {
    let name = declaration.name().to_string();

    match expand_declaration(context, declaration, depth).await {
        Ok(loaded) => Ok(loaded),
        Err(err) if context.options.is_critical => Err(err.at_preset(name, depth)),
        Err(err) => {
            if depth > 0 {
                tracing::warn!(preset = %name, depth, "Failed to load preset on level {}", depth);
            } else {
                tracing::warn!(preset = %name, "Failed to load preset");
            }
            tracing::error!(preset = %name, depth, error = %err, "Preset skipped");
            Ok(Vec::new())
        }
    }
}

async fn expand_declaration(
    context: &LoadContext<'_>,
    declaration: PresetDeclaration,
    depth: usize,
) -> Result<Vec<LoadedPreset>> {
    let name = declaration.name().to_string();
    let preset_options = declaration.options();

    let module = match declaration {
        PresetDeclaration::Virtual(addon) => ContributorModule::Value(addon.into_contents()),
        other => context.loader.load(other.name()).await?,
    };

    let contents = match module {
        ContributorModule::Value(contents) => contents,
        ContributorModule::Factory(factory) => {
            let combined = CombinedOptions::for_loading(&context.options.session, &preset_options);
            let expanded = factory.call(&combined).map_err(|e| Error::Factory {
                name: name.clone(),
                message: e.to_string(),
            })?;
            match expanded {
                Expanded::Contents(contents) => contents,
                Expanded::Alias(list) => {
                    tracing::debug!(preset = %name, depth, count = list.len(), "Expanding preset alias");
                    return load_level(context, list, depth + 1).await;
                }
            }
        }
        ContributorModule::ArrayAlias(list) => {
            tracing::debug!(preset = %name, depth, count = list.len(), "Expanding preset alias");
            return load_level(context, list, depth + 1).await;
        }
    };

    let ModuleContents {
        presets,
        addons,
        body,
    } = contents;
    let combined = CombinedOptions::for_loading(&context.options.session, &preset_options);

    let mut children = resolve_list(context, &name, presets, &combined)?;
    let addons = resolve_list(context, &name, addons, &combined)?;
    children.extend(
        addons
            .into_iter()
            .filter_map(|addon| resolve_addon_declaration(context, addon)),
    );

    let mut loaded = if children.is_empty() {
        Vec::new()
    } else {
        load_level(context, children, depth + 1).await?
    };
    tracing::debug!(preset = %name, depth, extensions = body.len(), "Loaded preset");
    loaded.push(LoadedPreset::new(name, body, preset_options));
    Ok(loaded)
}

/// Produce a `presets`/`addons` list and drop disabled entries.
fn resolve_list(
    context: &LoadContext<'_>,
    owner: &str,
    source: Option<DeclarationSource>,
    combined: &CombinedOptions,
) -> Result<Vec<PresetDeclaration>> {
    let Some(source) = source else {
        return Ok(Vec::new());
    };
    let list = source.resolve(combined).map_err(|e| Error::Factory {
        name: owner.to_string(),
        message: e.to_string(),
    })?;

    Ok(list
        .into_iter()
        .filter(|declaration| {
            let disabled = context.options.is_disabled(declaration.name());
            if disabled {
                tracing::debug!(preset = %declaration, owner, "Skipping disabled addon");
            }
            !disabled
        })
        .collect())
}

/// Classify an addon entry; unresolvable addons are skipped with a warning.
fn resolve_addon_declaration(
    context: &LoadContext<'_>,
    addon: PresetDeclaration,
) -> Option<PresetDeclaration> {
    if matches!(addon, PresetDeclaration::Virtual(_)) {
        return Some(addon);
    }

    let options = addon.options();
    match resolve_addon(context.loader, context.options.config_dir(), addon.name(), &options) {
        Ok(Some(resolved)) => Some(resolved.into_declaration(options)),
        Ok(None) => {
            tracing::warn!(
                addon = addon.name(),
                "Could not resolve addon \"{}\", skipping. Is it installed?",
                addon.name()
            );
            None
        }
        Err(err) => {
            tracing::warn!(
                addon = addon.name(),
                error = %err,
                "Could not resolve addon \"{}\", skipping. Is it installed?",
                addon.name()
            );
            None
        }
    }
}
