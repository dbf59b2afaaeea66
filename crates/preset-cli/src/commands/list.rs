//! List the flattened preset tree

use std::path::Path;

use colored::Colorize;
use preset_core::PresetSummary;

use super::load_config;
use crate::error::Result;

/// Run the list command
pub async fn run_list(config: &Path, json: bool) -> Result<()> {
    let presets = load_config(config).await?;
    let summaries: Vec<PresetSummary> = presets.list().iter().map(|p| p.summary()).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{}", "Presets (fold order)".bold());
    println!();

    if summaries.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (index, summary) in summaries.iter().enumerate() {
        let extensions = if summary.extensions.is_empty() {
            "-".to_string()
        } else {
            summary.extensions.join(", ")
        };
        println!(
            "  {:>3}. {} {}",
            index + 1,
            summary.name.green(),
            format!("[{extensions}]").dimmed()
        );
    }

    println!();
    println!(
        "{} {} presets loaded.",
        "Total:".dimmed(),
        summaries.len()
    );
    Ok(())
}
