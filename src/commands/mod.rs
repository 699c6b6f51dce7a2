// src/commands/mod.rs
//! Command handlers for the ccdcsqlite3 CLI

mod build;
mod patch;
mod scan;

// Re-export all command handlers
pub use build::cmd_build;
pub use patch::cmd_patch;
pub use scan::cmd_scan;
