// src/workshop/patch.rs

//! The filesystem shell around the pure symbol renamer
//!
//! All three target files are read and transformed in memory first; nothing
//! on disk changes until every transform has succeeded. Write-back goes
//! through a temporary sibling file and a rename, so a crash mid-write never
//! leaves a truncated source file behind. A stage failure removes whatever
//! temporaries were already written.

use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::recipe::PatchSection;
use crate::rename::{insert_directives, rename_shell_symbols, scan_exports};

/// What the patch step did to a source tree
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    /// Exported declarations discovered in the header
    pub exports_found: usize,
    /// Alias directives inserted (0 when the header was already patched)
    pub directives_inserted: usize,
    /// Shell symbols substituted from the fixed table
    pub shell_renames: Vec<String>,
}

/// Rename the exported symbols of an unpacked source tree
///
/// Reads the header, implementation, and shell files named by `patch`,
/// splices the alias directive block into the header, applies the fixed
/// rename table to the shell source, and writes all three files back. The
/// implementation is written back byte for byte; it picks the aliases up
/// from the header at compile time.
pub fn patch_source_tree(source_dir: &Path, patch: &PatchSection) -> Result<PatchOutcome> {
    let header_path = source_dir.join(&patch.header);
    let impl_path = source_dir.join(&patch.implementation);
    let shell_path = source_dir.join(&patch.shell);

    let header = read_text(&header_path)?;
    let implementation = read_text(&impl_path)?;
    let shell = read_text(&shell_path)?;

    // Every transform runs before anything is written back
    let rules = &patch.rules;
    let names = scan_exports(&header, rules)?;
    let (patched_header, directives_inserted) = insert_directives(&header, &names, rules)?;
    let (patched_shell, shell_renames) = rename_shell_symbols(&shell, &patch.shell, rules)?;

    // Stage all temporaries first, then rename them into place
    let outputs = [
        (header_path, patched_header),
        (impl_path, implementation),
        (shell_path, patched_shell),
    ];
    let mut staged = Vec::with_capacity(outputs.len());
    for (target_path, content) in &outputs {
        match stage_write(target_path, content) {
            Ok(temp_path) => staged.push((temp_path, target_path)),
            Err(e) => {
                // A failed stage must not strand the temporaries written
                // before it
                for (temp_path, _) in &staged {
                    let _ = fs::remove_file(temp_path);
                }
                return Err(e);
            }
        }
    }
    for (temp_path, target_path) in &staged {
        fs::rename(temp_path, target_path)?;
    }

    debug!(
        "Patched {}: {} exports, {} directives, {} shell renames",
        source_dir.display(),
        names.len(),
        directives_inserted,
        shell_renames.len()
    );

    Ok(PatchOutcome {
        exports_found: names.len(),
        directives_inserted,
        shell_renames,
    })
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::NotFound(format!("{}: {}", path.display(), e)))
}

/// Write `content` to a temporary sibling of `path` and return its location
fn stage_write(path: &Path, content: &str) -> Result<PathBuf> {
    // Appended rather than swapped in for the extension: sqlite3.h and
    // sqlite3.c must not stage to the same temporary
    let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    temp_name.push(".ccdcsqlite3-tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file = File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    Ok(temp_path)
}
