// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use commands::{cmd_build, cmd_patch, cmd_scan};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Build {
            recipe,
            output,
            source_cache,
            jobs,
            keep_builddir,
            validate_only,
            fetch_only,
        }) => cmd_build(
            &recipe,
            &output,
            &source_cache,
            jobs,
            keep_builddir,
            validate_only,
            fetch_only,
        ),
        Some(Commands::Patch { source_dir, recipe }) => {
            cmd_patch(&source_dir, recipe.as_deref())
        }
        Some(Commands::Scan { header, recipe }) => cmd_scan(&header, recipe.as_deref()),
        None => {
            // No command provided, show help
            println!("ccdcsqlite3 build tool v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'ccdcsqlite3 --help' for usage information");
            Ok(())
        }
    }
}
