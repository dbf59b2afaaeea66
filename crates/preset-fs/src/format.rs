//! Supported contributor document formats

/// A serialization format recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Toml,
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Extensions that name a loadable document, in resolution preference order.
    pub const EXTENSIONS: [&'static str; 4] = ["toml", "json", "yaml", "yml"];

    /// Detect the format from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Human-readable name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }

    /// Rank of an extension when several files share a stem.
    ///
    /// Document extensions come first in [`Self::EXTENSIONS`] order; anything
    /// else sorts after them.
    pub fn preference(extension: Option<&str>) -> usize {
        extension
            .and_then(|ext| {
                Self::EXTENSIONS
                    .iter()
                    .position(|known| known.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(Self::EXTENSIONS.len())
    }
}
