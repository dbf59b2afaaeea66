//! Forward-slash paths for resolved module locations

use std::path::{Path, PathBuf};

/// A module location spelled with forward slashes.
///
/// Resolved paths end up in preset names and addon entry lists, so they use
/// one spelling on every platform and only become a native `PathBuf` again
/// when a file is read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(path.as_ref().to_string_lossy().replace('\\', "/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Native form for I/O.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }

    /// Append a segment, which may itself contain separators.
    pub fn join(&self, segment: &str) -> Self {
        let base = self.0.trim_end_matches('/');
        Self(format!("{base}/{}", segment.replace('\\', "/")))
    }

    /// The containing directory. `None` for a single relative segment.
    pub fn parent(&self) -> Option<Self> {
        let (dir, _) = self.trimmed().rsplit_once('/')?;
        Some(Self(if dir.is_empty() { "/".into() } else { dir.into() }))
    }

    /// Last segment, ignoring a trailing slash.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.trimmed();
        let name = trimmed.rsplit_once('/').map_or(trimmed, |(_, name)| name);
        (!name.is_empty()).then_some(name)
    }

    /// File name without its extension (`.hidden` is all stem).
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        Some(split_extension(name).map_or(name, |(stem, _)| stem))
    }

    pub fn extension(&self) -> Option<&str> {
        split_extension(self.file_name()?).map(|(_, extension)| extension)
    }

    fn trimmed(&self) -> &str {
        self.0.trim_end_matches('/')
    }
}

/// Absolute form of `path`, canonical when it exists.
///
/// Relative paths are taken against the current directory so that walking
/// ancestors reaches past it.
pub fn absolute(path: &Path) -> PathBuf {
    dunce::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn split_extension(name: &str) -> Option<(&str, &str)> {
    name.rsplit_once('.').filter(|(stem, _)| !stem.is_empty())
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NormalizedPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}
