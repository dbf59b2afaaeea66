//! Specifier resolution against the filesystem.
//!
//! A specifier is resolved the way package-style module systems do it:
//!
//! - `./x` and `../x` are relative to the base directory,
//! - `/abs/x` (or a Windows drive path) is used as-is,
//! - anything else is a bare package name, looked up in the packages
//!   directory of the base directory or of the nearest ancestor that has one.
//!
//! A candidate path resolves to the exact file if it exists, otherwise to a
//! file in the same directory whose stem matches (so `addon/manager` finds
//! `addon/manager.js` or `addon/manager.json`), otherwise to an `index` file
//! inside the candidate directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_PACKAGES_DIR, INDEX_STEM};
use crate::path::absolute;
use crate::{DocumentFormat, NormalizedPath};

/// How a specifier string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// Starts with `./` or `../` (or is `.` / `..`)
    Relative,
    /// An absolute filesystem path
    Absolute,
    /// A package name, optionally followed by a subpath
    Bare,
}

impl SpecifierKind {
    /// Classify a specifier. Returns `None` for an empty specifier.
    pub fn of(specifier: &str) -> Option<Self> {
        let trimmed = specifier.trim();
        if trimmed.is_empty() {
            return None;
        }
        let unified = trimmed.replace('\\', "/");
        if unified == "." || unified == ".." || unified.starts_with("./") || unified.starts_with("../")
        {
            Some(Self::Relative)
        } else if Path::new(trimmed).is_absolute() || unified.starts_with('/') {
            Some(Self::Absolute)
        } else {
            Some(Self::Bare)
        }
    }
}

/// A successfully resolved specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Canonical location of the module file
    pub path: NormalizedPath,
    /// Whether the module was found through a packages directory
    pub within_dependency: bool,
}

/// Filesystem prober for module specifiers.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    packages_dir: String,
}

impl Default for ModuleResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleResolver {
    /// Create a resolver that looks for bare specifiers in `packages/`.
    pub fn new() -> Self {
        Self {
            packages_dir: DEFAULT_PACKAGES_DIR.to_string(),
        }
    }

    /// Use a different directory name for bare specifier lookup.
    pub fn with_packages_dir(mut self, name: impl Into<String>) -> Self {
        self.packages_dir = name.into();
        self
    }

    /// Resolve `specifier` relative to `base_dir`.
    ///
    /// Never fails: anything that cannot be found, including an empty
    /// specifier, is `None`.
    pub fn resolve(&self, specifier: &str, base_dir: &Path) -> Option<Resolution> {
        let kind = SpecifierKind::of(specifier)?;
        let specifier = specifier.trim();

        let resolved = match kind {
            SpecifierKind::Relative => {
                resolve_candidate(&base_dir.join(specifier)).map(|path| (path, false))
            }
            SpecifierKind::Absolute => {
                resolve_candidate(Path::new(specifier)).map(|path| (path, false))
            }
            SpecifierKind::Bare => absolute(base_dir).ancestors().find_map(|ancestor| {
                let packages = ancestor.join(&self.packages_dir);
                if !packages.is_dir() {
                    return None;
                }
                resolve_candidate(&packages.join(specifier)).map(|path| (path, true))
            }),
        };

        match resolved {
            Some((path, within_dependency)) => {
                let canonical = dunce::canonicalize(&path).unwrap_or(path);
                tracing::trace!(specifier, path = %canonical.display(), "Resolved specifier");
                Some(Resolution {
                    path: NormalizedPath::new(canonical),
                    within_dependency,
                })
            }
            None => {
                tracing::trace!(specifier, base_dir = %base_dir.display(), "Specifier not found");
                None
            }
        }
    }
}

/// Resolve a concrete candidate path to an existing file.
fn resolve_candidate(candidate: &Path) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(candidate.to_path_buf());
    }

    if let (Some(parent), Some(stem)) = (candidate.parent(), candidate.file_name()) {
        if let Some(found) = find_by_stem(parent, &stem.to_string_lossy()) {
            return Some(found);
        }
    }

    if candidate.is_dir() {
        return find_by_stem(candidate, INDEX_STEM);
    }

    None
}

/// Find a file in `dir` whose name with the extension stripped equals `stem`.
///
/// Document extensions win over other extensions; ties are broken by file name
/// so the result does not depend on directory iteration order.
fn find_by_stem(dir: &Path, stem: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;

    let mut matches: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            let normalized = NormalizedPath::new(path);
            normalized.extension().is_some() && normalized.file_stem() == Some(stem)
        })
        .collect();

    matches.sort_by(|a, b| {
        let rank = |p: &Path| {
            DocumentFormat::preference(p.extension().and_then(|ext| ext.to_str()))
        };
        rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
    });
    matches.into_iter().next()
}
