// src/rename/rules.rs

//! The contract for what counts as an exported declaration
//!
//! The scan and the directive block are both driven by a small set of
//! literals. The defaults reproduce the stock SQLite amalgamation; a recipe
//! can override them under `[patch.rules]` when pointing the tool at a
//! source tree with different conventions.

use serde::{Deserialize, Serialize};

/// Literals driving the export scan and the alias directives
///
/// An exported declaration is a line carrying the export marker as a word
/// followed by a single blank; the symbol it declares is the last identifier
/// on that line that starts with the symbol prefix and is immediately
/// followed by `;`, `[`, or `(`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameRules {
    /// Token marking an exported declaration
    pub export_marker: String,

    /// Prefix shared by the public symbols to alias
    pub symbol_prefix: String,

    /// Prefix prepended to every symbol's aliased form
    pub alias_prefix: String,

    /// Include-guard markers, tried in order; the alias block is spliced
    /// in immediately after the first one found
    pub guard_markers: Vec<String>,
}

impl Default for RenameRules {
    fn default() -> Self {
        Self {
            export_marker: "SQLITE_API".to_string(),
            symbol_prefix: "sqlite3_".to_string(),
            alias_prefix: "ccdc_".to_string(),
            // Older amalgamations guard with _SQLITE3_H_, current ones
            // with SQLITE3_H
            guard_markers: vec![
                "#define _SQLITE3_H_".to_string(),
                "#define SQLITE3_H".to_string(),
            ],
        }
    }
}

impl RenameRules {
    /// The alias directive line for `name`, without a trailing newline
    pub fn directive(&self, name: &str) -> String {
        format!("#define {} {}", name, self.alias(name))
    }

    /// The aliased form of `name`
    pub fn alias(&self, name: &str) -> String {
        format!("{}{}", self.alias_prefix, name)
    }
}
