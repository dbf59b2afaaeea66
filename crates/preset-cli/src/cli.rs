//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Default configuration file, looked up in the current directory.
pub const DEFAULT_CONFIG: &str = "presets.toml";

/// Presets - Compose presets and addons, then fold extension points across them
#[derive(Parser, Debug)]
#[command(name = "presets")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List the loaded presets in fold order
    List {
        /// Configuration file
        #[arg(short, long, env = "PRESETS_CONFIG", default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Fold an extension point across the loaded presets
    ///
    /// Examples:
    ///   presets apply features
    ///   presets apply managerEntries --initial '[]'
    ///   presets apply builder --args '{"target": "web"}'
    Apply {
        /// Extension point name
        extension: String,

        /// Configuration file
        #[arg(short, long, env = "PRESETS_CONFIG", default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Initial value as JSON (defaults to null)
        #[arg(long)]
        initial: Option<String>,

        /// Call arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },

    /// Show how an addon specifier is classified
    Resolve {
        /// Addon specifier
        specifier: String,

        /// Directory to resolve from
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },
}
