//! Conventional names used when probing for addon entry points.

/// Directory searched for bare specifiers, in the base directory and every ancestor.
pub const DEFAULT_PACKAGES_DIR: &str = "packages";

/// File stem looked up inside a directory when a specifier names the directory itself.
pub const INDEX_STEM: &str = "index";

/// The conventional sibling entry points an addon package may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryRole {
    /// `<name>/preset`: build-time preset module
    Preset,
    /// `<name>/manager`: UI-registration entry
    Manager,
    /// `<name>/preview`: runtime-annotation entry
    Preview,
}

impl EntryRole {
    /// Get the string representation of the entry name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preset => "preset",
            Self::Manager => "manager",
            Self::Preview => "preview",
        }
    }

    /// Build the sibling specifier for this role, e.g. `addon-a/manager`.
    pub fn sibling_of(&self, specifier: &str) -> String {
        format!("{}/{}", specifier.trim_end_matches('/'), self.as_str())
    }
}

impl std::fmt::Display for EntryRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_of() {
        assert_eq!(EntryRole::Preset.sibling_of("addon-a"), "addon-a/preset");
        assert_eq!(EntryRole::Manager.sibling_of("./local/"), "./local/manager");
        assert_eq!(EntryRole::Preview.to_string(), "preview");
    }
}
