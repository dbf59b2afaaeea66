//! Format-agnostic document loading

use crate::{DocumentFormat, Error, NormalizedPath, Result, io};
use serde::de::DeserializeOwned;

/// Format-agnostic document store.
///
/// Detects the format from the file extension and deserializes the content
/// into any `DeserializeOwned` type, typically `serde_json::Value` or a
/// configuration struct.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a document from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let extension = path.extension().unwrap_or("");
        let format =
            DocumentFormat::from_extension(extension).ok_or_else(|| Error::UnsupportedFormat {
                extension: extension.to_string(),
            })?;
        let content = io::read_text(path)?;
        tracing::debug!(path = %path, format = format.name(), "Loading document");
        self.parse(&content, format, path)
    }

    /// Parse already-read content in the given format.
    ///
    /// `origin` is only used to label parse errors.
    pub fn parse<T: DeserializeOwned>(
        &self,
        content: &str,
        format: DocumentFormat,
        origin: &NormalizedPath,
    ) -> Result<T> {
        let parse_error = |message: String| Error::ConfigParse {
            path: origin.to_native(),
            format: format.name().into(),
            message,
        };

        match format {
            DocumentFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
            DocumentFormat::Json => {
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
            DocumentFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))
            }
        }
    }
}
