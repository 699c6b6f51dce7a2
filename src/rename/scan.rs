// src/rename/scan.rs

//! Export declaration scanner

use std::collections::BTreeSet;

use regex::Regex;

use super::rules::RenameRules;
use crate::error::{Error, Result};

/// Collect the exported symbol names declared in `text`
///
/// The returned names are deduplicated and in lexicographic order, so the
/// directive block built from them is stable across runs. Matching is
/// line-scoped: the export marker as a word, one blank, then the last
/// identifier on the line that starts with the symbol prefix and is
/// immediately followed by `;`, `[`, or `(`. That terminator requirement is
/// what skips type names like `sqlite3_int64` in the middle of a declaration
/// while still catching functions, arrays, and plain variables.
///
/// Zero matches means the marker or prefix no longer fits the upstream
/// header, which is an error here for the same reason a missing include
/// guard is.
pub fn scan_exports(text: &str, rules: &RenameRules) -> Result<Vec<String>> {
    // Match: MARKER <blank> ... last `prefixname` followed by ; [ or (
    let pattern = format!(
        r"\b{}[ \t].*({}\w+)[;\[(]",
        regex::escape(&rules.export_marker),
        regex::escape(&rules.symbol_prefix)
    );
    let re = Regex::new(&pattern)
        .map_err(|e| Error::ParseError(format!("invalid export pattern: {}", e)))?;

    let names: BTreeSet<String> = re
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect();

    if names.is_empty() {
        return Err(Error::ExportScanEmpty {
            marker: rules.export_marker.clone(),
            prefix: rules.symbol_prefix.clone(),
        });
    }

    Ok(names.into_iter().collect())
}
