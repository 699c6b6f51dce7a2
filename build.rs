// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe file
fn recipe_arg() -> Arg {
    Arg::new("recipe")
        .short('r')
        .long("recipe")
        .value_name("PATH")
        .help("Recipe file providing the rename rules")
}

fn build_cli() -> Command {
    Command::new("ccdcsqlite3")
        .version(env!("CARGO_PKG_VERSION"))
        .author("CCDC Build Tools")
        .about("Build a symbol-prefixed SQLite from an upstream amalgamation")
        .subcommand_required(false)
        .subcommand(
            Command::new("build")
                .about("Build a package from a recipe (fetch, unpack, patch, compile, stage)")
                .arg(
                    Arg::new("recipe")
                        .short('r')
                        .long("recipe")
                        .value_name("PATH")
                        .default_value("recipes/ccdcsqlite3.toml")
                        .help("Recipe file"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .default_value("dist")
                        .help("Output directory for the staged package"),
                )
                .arg(
                    Arg::new("source_cache")
                        .long("source-cache")
                        .default_value("/var/cache/ccdcsqlite3/sources")
                        .help("Directory for caching downloaded source archives"),
                )
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help("Number of parallel build jobs"),
                )
                .arg(
                    Arg::new("keep_builddir")
                        .long("keep-builddir")
                        .action(clap::ArgAction::SetTrue)
                        .help("Keep the build directory after completion"),
                )
                .arg(
                    Arg::new("validate_only")
                        .long("validate-only")
                        .action(clap::ArgAction::SetTrue)
                        .help("Only validate the recipe, don't build"),
                )
                .arg(
                    Arg::new("fetch_only")
                        .long("fetch-only")
                        .action(clap::ArgAction::SetTrue)
                        .help("Only fetch the source archive, don't build"),
                ),
        )
        .subcommand(
            Command::new("patch")
                .about("Patch an already-unpacked source tree in place")
                .arg(
                    Arg::new("source_dir")
                        .required(true)
                        .help("Directory containing the unpacked sources"),
                )
                .arg(recipe_arg()),
        )
        .subcommand(
            Command::new("scan")
                .about("Scan a header and list the exported symbols that would be renamed")
                .arg(
                    Arg::new("header")
                        .required(true)
                        .help("Path to the header file"),
                )
                .arg(recipe_arg()),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("ccdcsqlite3.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
        return;
    }

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
