// src/commands/build.rs

//! Build command - build a prefixed SQLite package from a recipe

use anyhow::{Context, Result};
use ccdcsqlite3::{parse_recipe_file, validate_recipe, Workshop, WorkshopConfig};
use std::path::{Path, PathBuf};
use tracing::info;

/// Build a package from a recipe
///
/// # Arguments
/// * `recipe_path` - Path to the recipe file
/// * `output_dir` - Output directory for the staged package
/// * `source_cache` - Directory for caching downloaded sources
/// * `jobs` - Number of parallel build jobs (None = auto)
/// * `keep_builddir` - Keep build directory after completion
/// * `validate_only` - Only validate the recipe, don't build
/// * `fetch_only` - Only fetch the source archive, don't build
pub fn cmd_build(
    recipe_path: &str,
    output_dir: &str,
    source_cache: &str,
    jobs: Option<u32>,
    keep_builddir: bool,
    validate_only: bool,
    fetch_only: bool,
) -> Result<()> {
    let recipe_path = Path::new(recipe_path);
    let output_dir = Path::new(output_dir);

    // Parse the recipe
    println!("Reading recipe: {}", recipe_path.display());
    let recipe = parse_recipe_file(recipe_path)
        .with_context(|| format!("Failed to parse recipe: {}", recipe_path.display()))?;

    println!(
        "Recipe: {} version {}",
        recipe.package.name, recipe.package.version
    );
    if let Some(homepage) = &recipe.package.homepage {
        println!("Homepage: {}", homepage);
    }

    // Validate the recipe
    let warnings = validate_recipe(&recipe).with_context(|| "Recipe validation failed")?;

    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    if validate_only {
        println!("Recipe validation passed");
        if warnings.is_empty() {
            println!("[OK] No issues found");
        } else {
            println!("[OK] {} warning(s)", warnings.len());
        }
        return Ok(());
    }

    // Configure the workshop
    let mut config = WorkshopConfig {
        source_cache: PathBuf::from(source_cache),
        keep_builddir,
        ..Default::default()
    };

    if let Some(j) = jobs {
        config.jobs = j;
    }

    let workshop = Workshop::new(config.clone());

    // Fetch-only mode: just download the source archive and exit
    if fetch_only {
        println!("Fetching source archive (fetch-only mode)...");
        let archive = workshop
            .fetch(&recipe)
            .with_context(|| format!("Failed to fetch source for {}", recipe.package.name))?;

        println!("\n[COMPLETE] Fetched: {}", archive.display());
        println!("[OK] Source is cached. Ready for offline build.");
        return Ok(());
    }

    // Create output directory if needed
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    println!("Building with {} parallel jobs...", config.jobs);
    if workshop.source_cached(&recipe) {
        println!("  - Source archive already cached (offline build possible)");
    }

    let result = workshop
        .build(&recipe, output_dir)
        .with_context(|| format!("Failed to build {}", recipe.package.name))?;

    println!("\n[COMPLETE] Staged: {}", result.package_root.display());
    println!(
        "  - {} exported symbols found, {} alias directives inserted",
        result.patch.exports_found, result.patch.directives_inserted
    );
    println!(
        "  - {} shell symbol(s) renamed",
        result.patch.shell_renames.len()
    );

    if !result.warnings.is_empty() {
        println!("\nBuild warnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }

    if let Some(scratch) = &result.scratch_dir {
        println!("Scratch directory kept: {}", scratch.display());
    }

    // Keep the full build log next to the staged root
    let log_name = result
        .package_root
        .file_name()
        .map(|n| format!("{}.log", n.to_string_lossy()))
        .unwrap_or_else(|| "build.log".to_string());
    let log_path = output_dir.join(log_name);
    std::fs::write(&log_path, &result.log)
        .with_context(|| format!("Failed to write build log: {}", log_path.display()))?;
    println!("Build log: {}", log_path.display());

    info!(
        "Successfully built {} to {}",
        recipe.package.name,
        result.package_root.display()
    );

    Ok(())
}
