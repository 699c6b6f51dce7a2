// src/lib.rs

//! ccdcsqlite3 build tool
//!
//! Builds a customized SQLite whose exported API is hidden behind a
//! `ccdc_` prefix, so the result can link into a process next to an
//! unmodified SQLite without symbol collisions.
//!
//! # Architecture
//!
//! - Rename-first: the symbol aliasing is a pure text transform, usable
//!   on its own without fetching or building anything
//! - Recipes: the upstream archive, checksum, and build commands live in
//!   a TOML file, not in code
//! - Workshop: fetch, unpack, patch, compile, stage as discrete phases
//!   with a per-build scratch directory and a shared source cache

mod error;
pub mod recipe;
pub mod rename;
pub mod workshop;

pub use error::{Error, Result};
pub use recipe::{parse_recipe, parse_recipe_file, validate_recipe, Recipe};
pub use rename::{rename_exports, scan_exports, RenameRules};
pub use workshop::{
    patch_source_tree, BuildResult, PatchOutcome, Workshop, WorkshopConfig,
};
