// src/commands/scan.rs

//! Scan command - list the exported symbols a header would have renamed

use anyhow::{Context, Result};
use ccdcsqlite3::{parse_recipe_file, scan_exports, RenameRules};
use std::path::Path;

/// Scan a header for exported symbols
///
/// # Arguments
/// * `header_path` - Path to the header file
/// * `recipe_path` - Optional recipe providing the rename rules
pub fn cmd_scan(header_path: &str, recipe_path: Option<&str>) -> Result<()> {
    let rules = match recipe_path {
        Some(path) => {
            let recipe = parse_recipe_file(Path::new(path))
                .with_context(|| format!("Failed to parse recipe: {}", path))?;
            recipe.patch.rules
        }
        None => RenameRules::default(),
    };

    let text = std::fs::read_to_string(header_path)
        .with_context(|| format!("Failed to read header: {}", header_path))?;

    let names = scan_exports(&text, &rules)
        .with_context(|| format!("Failed to scan {}", header_path))?;

    for name in &names {
        println!("{} -> {}", name, rules.alias(name));
    }
    println!("\n[OK] {} exported symbol(s)", names.len());

    Ok(())
}
