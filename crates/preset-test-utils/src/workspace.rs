//! [`TestWorkspace`] builder for preset loading scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::TempDir;

/// Directory bare specifiers are looked up in.
pub const PACKAGES_DIR: &str = "packages";

/// A temporary directory laid out like a project using presets.
///
/// # Example
///
/// ```rust,no_run
/// use preset_test_utils::TestWorkspace;
/// use serde_json::json;
///
/// let ws = TestWorkspace::new();
/// ws.write_json("local.json", &json!({ "features": { "a": true } }));
/// ws.write_package("addon-docs", &[("preset.json", "{}"), ("manager.json", "{}")]);
/// ws.write_config("presets = [\"./local.json\"]\naddons = [\"addon-docs\"]\n");
/// ws.assert_file_exists("packages/addon-docs/preset.json");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `relative` inside the workspace.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Canonical absolute path of `relative`, with forward slashes.
    ///
    /// Matches the spelling the resolver reports for files found by path.
    pub fn resolved(&self, relative: &str) -> String {
        let path = self.path(relative);
        let canonical = dunce::canonicalize(&path).unwrap_or(path);
        canonical.to_string_lossy().replace('\\', "/")
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a JSON document to `relative`.
    pub fn write_json(&self, relative: &str, value: &Value) -> PathBuf {
        self.write(relative, &serde_json::to_string_pretty(value).unwrap())
    }

    /// Write `presets.toml` at the root.
    pub fn write_config(&self, content: &str) -> PathBuf {
        self.write("presets.toml", content)
    }

    /// Create `packages/<name>/` with the given `(file, content)` pairs.
    pub fn write_package(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        let dir = self.path(PACKAGES_DIR).join(name);
        fs::create_dir_all(&dir).unwrap();
        for (file, content) in files {
            self.write(&format!("{PACKAGES_DIR}/{name}/{file}"), content);
        }
        dir
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
