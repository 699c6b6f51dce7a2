// src/rename/header.rs

//! Include-guard location and alias directive insertion

use std::collections::HashSet;

use super::rules::RenameRules;
use super::scan::scan_exports;
use crate::error::{Error, Result};

/// Byte offset immediately after the first include-guard marker found
///
/// Markers are tried in rule order, so when a header somehow carries both
/// spellings the earlier rule wins.
fn insertion_point(text: &str, rules: &RenameRules) -> Result<usize> {
    for marker in &rules.guard_markers {
        if let Some(pos) = text.find(marker.as_str()) {
            return Ok(pos + marker.len());
        }
    }
    Err(Error::PatchTargetNotFound {
        tried: rules.guard_markers.clone(),
    })
}

/// Splice alias directives for `names` in after the include guard
///
/// One `#define NAME <alias>NAME` line per name, in the order given,
/// separated from the surrounding text by a blank line on each side. Names
/// whose exact directive line is already present are skipped, so running the
/// patch twice inserts nothing the second time and a header where upstream
/// added new exports gets directives only for the new names. Returns the new
/// text and the number of directives inserted; zero means the text came back
/// unchanged.
pub fn insert_directives(
    text: &str,
    names: &[String],
    rules: &RenameRules,
) -> Result<(String, usize)> {
    let point = insertion_point(text, rules)?;

    let existing: HashSet<&str> = text.lines().collect();
    let block: Vec<String> = names
        .iter()
        .map(|name| rules.directive(name))
        .filter(|line| !existing.contains(line.as_str()))
        .collect();

    if block.is_empty() {
        return Ok((text.to_string(), 0));
    }

    let patched = format!(
        "{}\n\n{}\n\n{}",
        &text[..point],
        block.join("\n"),
        &text[point..]
    );

    Ok((patched, block.len()))
}

/// Rename the exported API of a header/implementation pair
///
/// Scans the header for exported declarations and splices a sorted block of
/// alias directives in after its include guard. The implementation text
/// passes through byte for byte: the alias macros reach it through header
/// inclusion when the library is compiled.
pub fn rename_exports(
    header: &str,
    implementation: &str,
    rules: &RenameRules,
) -> Result<(String, String)> {
    let names = scan_exports(header, rules)?;
    let (patched, _) = insert_directives(header, &names, rules)?;
    Ok((patched, implementation.to_string()))
}
