// src/commands/patch.rs

//! Patch command - rename exported symbols in an unpacked source tree

use anyhow::{Context, Result};
use ccdcsqlite3::recipe::PatchSection;
use ccdcsqlite3::{parse_recipe_file, patch_source_tree};
use std::path::Path;
use tracing::info;

/// Patch an unpacked source tree in place
///
/// # Arguments
/// * `source_dir` - Directory containing the unpacked sources
/// * `recipe_path` - Optional recipe providing the rename rules
pub fn cmd_patch(source_dir: &str, recipe_path: Option<&str>) -> Result<()> {
    let source_dir = Path::new(source_dir);

    let patch = match recipe_path {
        Some(path) => {
            println!("Reading recipe: {}", path);
            let recipe = parse_recipe_file(Path::new(path))
                .with_context(|| format!("Failed to parse recipe: {}", path))?;
            recipe.patch
        }
        None => PatchSection::default(),
    };

    println!("Patching source tree: {}", source_dir.display());
    let outcome = patch_source_tree(source_dir, &patch)
        .with_context(|| format!("Failed to patch {}", source_dir.display()))?;

    if outcome.directives_inserted == 0 && outcome.shell_renames.is_empty() {
        println!("\n[OK] Source tree already patched; no changes needed");
        return Ok(());
    }

    println!(
        "\n[COMPLETE] Patched {}: {} exported symbols found, {} alias directives inserted",
        patch.header, outcome.exports_found, outcome.directives_inserted
    );
    for symbol in &outcome.shell_renames {
        println!("  - renamed {} in {}", symbol, patch.shell);
    }

    info!("Patched source tree at {}", source_dir.display());

    Ok(())
}
