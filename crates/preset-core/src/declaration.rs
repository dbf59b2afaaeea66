//! Preset declarations: "include this plugin, optionally parameterized".

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::addon::VirtualAddon;
use crate::error::{Error, Result};

/// A single entry in a `presets` or `addons` list.
///
/// Configuration documents may spell a declaration as a bare string, as a
/// `{ name, options }` table, or as a `[name, options]` pair. The `Virtual`
/// form is only ever produced by addon resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum PresetDeclaration {
    /// Bare specifier
    Name(String),
    /// Specifier with preset options
    WithOptions {
        name: String,
        options: Map<String, Value>,
    },
    /// Addon bundle found by sibling probing
    Virtual(VirtualAddon),
}

impl PresetDeclaration {
    /// Declare a preset with options.
    pub fn with_options(name: impl Into<String>, options: Map<String, Value>) -> Self {
        Self::WithOptions {
            name: name.into(),
            options,
        }
    }

    /// The specifier (or addon name for a virtual bundle).
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::WithOptions { name, .. } => name,
            Self::Virtual(addon) => &addon.name,
        }
    }

    /// Options attached to this declaration. Empty when none were given.
    pub fn options(&self) -> Map<String, Value> {
        match self {
            Self::WithOptions { options, .. } => options.clone(),
            Self::Name(_) | Self::Virtual(_) => Map::new(),
        }
    }

    /// Convert a loose JSON value into a declaration.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::InvalidDeclaration {
            reason: e.to_string(),
        })
    }

    /// Convert a JSON array of loose declarations.
    pub fn list_from_value(value: Value) -> Result<Vec<Self>> {
        match value {
            Value::Array(items) => items.into_iter().map(Self::from_value).collect(),
            other => Err(Error::InvalidDeclaration {
                reason: format!("expected a list of declarations, found {}", kind_of(&other)),
            }),
        }
    }

    /// Replace the specifier, keeping options.
    pub(crate) fn renamed(self, name: String) -> Self {
        match self {
            Self::Name(_) => Self::Name(name),
            Self::WithOptions { options, .. } => Self::WithOptions { name, options },
            virtual_addon @ Self::Virtual(_) => virtual_addon,
        }
    }
}

impl From<&str> for PresetDeclaration {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for PresetDeclaration {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl std::fmt::Display for PresetDeclaration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NamedDeclaration {
    name: String,
    #[serde(default)]
    options: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDeclaration {
    Name(String),
    Table(NamedDeclaration),
    Pair(String, Map<String, Value>),
}

impl<'de> Deserialize<'de> for PresetDeclaration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawDeclaration::deserialize(deserializer).map_err(|_| {
            serde::de::Error::custom(
                "expected a preset name, a { name, options } table or a [name, options] pair",
            )
        })?;
        Ok(match raw {
            RawDeclaration::Name(name) => Self::Name(name),
            RawDeclaration::Table(NamedDeclaration { name, options }) => {
                Self::WithOptions { name, options }
            }
            RawDeclaration::Pair(name, options) => Self::WithOptions { name, options },
        })
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_all_shapes() {
        let list = PresetDeclaration::list_from_value(json!([
            "addon-a",
            { "name": "addon-b", "options": { "x": 1 } },
            ["addon-c", { "y": true }],
            { "name": "addon-d" }
        ]))
        .unwrap();

        assert_eq!(list[0], PresetDeclaration::Name("addon-a".into()));
        assert_eq!(list[1].name(), "addon-b");
        assert_eq!(list[1].options().get("x"), Some(&json!(1)));
        assert_eq!(list[2].options().get("y"), Some(&json!(true)));
        assert!(list[3].options().is_empty());
    }

    #[test]
    fn test_reject_unknown_shape() {
        assert!(PresetDeclaration::from_value(json!(42)).is_err());
        assert!(PresetDeclaration::from_value(json!({ "name": "a", "extra": 1 })).is_err());
        assert!(PresetDeclaration::list_from_value(json!("not-a-list")).is_err());
    }

    #[test]
    fn test_renamed_keeps_options() {
        let mut options = Map::new();
        options.insert("k".into(), json!("v"));
        let decl = PresetDeclaration::with_options("./local", options).renamed("/abs/local".into());

        assert_eq!(decl.name(), "/abs/local");
        assert_eq!(decl.options().get("k"), Some(&json!("v")));
    }
}
