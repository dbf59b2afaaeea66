//! Show how an addon specifier is classified

use std::path::Path;

use colored::Colorize;
use preset_core::{FsModuleLoader, ResolvedAddon, resolve_addon};
use serde_json::Map;

use crate::error::{CliError, Result};

/// Run the resolve command
pub fn run_resolve(specifier: &str, dir: &Path) -> Result<()> {
    let loader = FsModuleLoader::new(dir);
    let resolved = resolve_addon(&loader, dir, specifier, &Map::new())?.ok_or_else(|| {
        CliError::user(format!(
            "Could not resolve addon \"{specifier}\" from {}",
            dir.display()
        ))
    })?;

    match resolved {
        ResolvedAddon::Direct { path } => {
            println!("{} {}", "direct".cyan().bold(), specifier);
            println!("  {:<8} {}", "preset", path);
        }
        ResolvedAddon::Virtual(addon) => {
            println!("{} {}", "virtual".cyan().bold(), addon.name);
            let entries = [
                ("preset", addon.preset.map(|p| p.name().to_string())),
                ("manager", addon.manager),
                ("preview", addon.preview),
            ];
            for (role, entry) in entries {
                match entry {
                    Some(path) => println!("  {:<8} {}", role, path),
                    None => println!("  {:<8} {}", role, "-".dimmed()),
                }
            }
        }
    }
    Ok(())
}
