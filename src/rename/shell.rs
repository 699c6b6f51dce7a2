// src/rename/shell.rs

//! Fixed rename table for the interactive shell source

use super::rules::RenameRules;
use crate::error::{Error, Result};

/// Symbols the shell source calls that never appear in the public header
///
/// These are Windows codepage helpers declared inside the shell translation
/// unit itself, so the alias macros spliced into the header cannot reach
/// them. They are renamed by exact text substitution instead. The list is
/// deliberately hardcoded: when upstream adds or removes one of these, the
/// substitution fails loudly and the table gets reviewed by hand.
pub const SHELL_RENAMES: [&str; 4] = [
    "sqlite3_win32_unicode_to_utf8",
    "sqlite3_win32_mbcs_to_utf8_v2",
    "sqlite3_win32_utf8_to_mbcs_v2",
    "sqlite3_win32_utf8_to_unicode",
];

/// Rename every table symbol in `text` to its alias-prefixed form
///
/// Substitution is plain text replacement of every occurrence. A symbol
/// already present in aliased form is skipped, keeping a second run from
/// double-prefixing it; a symbol absent in both forms means the upstream
/// shell source drifted and is an error. `file` only labels the error.
/// Returns the new text and the symbols that were substituted.
pub fn rename_shell_symbols(
    text: &str,
    file: &str,
    rules: &RenameRules,
) -> Result<(String, Vec<String>)> {
    let mut patched = text.to_string();
    let mut renamed = Vec::new();

    for symbol in SHELL_RENAMES {
        let alias = rules.alias(symbol);
        if patched.contains(&alias) {
            continue;
        }
        if !patched.contains(symbol) {
            return Err(Error::SymbolNotFound {
                symbol: symbol.to_string(),
                file: file.to_string(),
            });
        }
        patched = patched.replace(symbol, &alias);
        renamed.push(symbol.to_string());
    }

    Ok((patched, renamed))
}
