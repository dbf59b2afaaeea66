//! Error types for preset-core

use std::path::PathBuf;

/// Result type for preset-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading presets or folding extensions
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No module could be found for a specifier
    #[error("Cannot find module '{specifier}' from {base_dir}")]
    ModuleNotFound { specifier: String, base_dir: PathBuf },

    /// A module was found but its contents are not a contributor
    #[error("Invalid preset module '{specifier}': {reason}")]
    InvalidModule { specifier: String, reason: String },

    /// A preset declaration has an unsupported shape
    #[error("Invalid preset declaration: {reason}")]
    InvalidDeclaration { reason: String },

    /// A specifier cannot be resolved at all (e.g. it is empty)
    #[error("Invalid specifier '{specifier}': {reason}")]
    InvalidSpecifier { specifier: String, reason: String },

    /// A preset or declaration-list factory failed
    #[error("Preset factory for '{name}' failed: {message}")]
    Factory { name: String, message: String },

    /// A background loading task panicked or was cancelled
    #[error("Loading task for '{specifier}' failed: {message}")]
    LoadTask { specifier: String, message: String },

    /// Raised by contributor code (reducers, factories) to report a failure
    #[error("{0}")]
    Contributor(String),

    /// A reducer failed while folding an extension point
    #[error("Extension '{extension}' failed in preset '{preset}': {source}")]
    Reducer {
        extension: String,
        preset: String,
        #[source]
        source: Box<Error>,
    },

    /// A preset failed to load during a critical load
    #[error("Failed to load preset '{name}' at depth {depth}: {source}")]
    PresetLoad {
        name: String,
        depth: usize,
        #[source]
        source: Box<Error>,
    },

    /// Filesystem error from preset-fs
    #[error(transparent)]
    Fs(#[from] preset_fs::Error),
}

impl Error {
    /// Create an error from contributor code.
    pub fn contributor(message: impl Into<String>) -> Self {
        Self::Contributor(message.into())
    }

    /// Wrap this error with the identity of the preset that failed to load.
    ///
    /// An error that already names a failing preset is returned unchanged, so
    /// a critical failure deep in the tree keeps the innermost name and depth.
    pub fn at_preset(self, name: impl Into<String>, depth: usize) -> Self {
        match self {
            err @ Self::PresetLoad { .. } => err,
            other => Self::PresetLoad {
                name: name.into(),
                depth,
                source: Box::new(other),
            },
        }
    }
}
