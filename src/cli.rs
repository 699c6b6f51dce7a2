// src/cli.rs
//! CLI definitions for the ccdcsqlite3 build tool
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ccdcsqlite3")]
#[command(author = "CCDC Build Tools")]
#[command(version)]
#[command(about = "Build a symbol-prefixed SQLite from an upstream amalgamation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a package from a recipe (fetch, unpack, patch, compile, stage)
    Build {
        /// Path to the recipe file
        #[arg(short, long, default_value = "recipes/ccdcsqlite3.toml")]
        recipe: String,

        /// Output directory for the staged package
        #[arg(short, long, default_value = "dist")]
        output: String,

        /// Directory for caching downloaded source archives
        #[arg(long, default_value = "/var/cache/ccdcsqlite3/sources")]
        source_cache: String,

        /// Number of parallel build jobs (default: all cores)
        #[arg(short, long)]
        jobs: Option<u32>,

        /// Keep the build directory after completion
        #[arg(long)]
        keep_builddir: bool,

        /// Only validate the recipe, don't build
        #[arg(long)]
        validate_only: bool,

        /// Only fetch the source archive, don't build
        #[arg(long)]
        fetch_only: bool,
    },

    /// Patch an already-unpacked source tree in place
    Patch {
        /// Directory containing the unpacked sources
        source_dir: String,

        /// Recipe file providing the rename rules (default rules if omitted)
        #[arg(short, long)]
        recipe: Option<String>,
    },

    /// Scan a header and list the exported symbols that would be renamed
    Scan {
        /// Path to the header file
        header: String,

        /// Recipe file providing the rename rules (default rules if omitted)
        #[arg(short, long)]
        recipe: Option<String>,
    },
}
