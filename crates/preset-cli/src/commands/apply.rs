//! Fold one extension point and print the result

use std::path::Path;

use serde_json::{Map, Value};

use super::load_config;
use crate::error::{CliError, Result};

/// Run the apply command
pub async fn run_apply(
    config: &Path,
    extension: &str,
    initial: Option<&str>,
    args: Option<&str>,
) -> Result<()> {
    let initial = match initial {
        Some(text) => serde_json::from_str::<Value>(text)?,
        None => Value::Null,
    };
    let args = parse_args(args)?;

    let presets = load_config(config).await?;
    tracing::debug!(extension, presets = presets.len(), "Applying extension");
    let folded = presets.apply(extension, initial, &args).await?;

    println!("{}", serde_json::to_string_pretty(&folded)?);
    Ok(())
}

fn parse_args(args: Option<&str>) -> Result<Map<String, Value>> {
    let Some(text) = args else {
        return Ok(Map::new());
    };
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::user("--args must be a JSON object")),
    }
}
