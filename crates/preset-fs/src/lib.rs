//! Filesystem layer for the preset composer
//!
//! Provides specifier resolution against the filesystem (the path prober used
//! by addon discovery) and format-agnostic loading of contributor documents.

pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod io;
pub mod path;
pub mod resolve;

pub use config::ConfigStore;
pub use constants::EntryRole;
pub use error::{Error, Result};
pub use format::DocumentFormat;
pub use path::{NormalizedPath, absolute};
pub use resolve::{ModuleResolver, Resolution, SpecifierKind};
