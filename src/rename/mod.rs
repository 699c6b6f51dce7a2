// src/rename/mod.rs

//! Symbol renaming for the customized SQLite build
//!
//! The customized library must coexist in one process with an unmodified
//! SQLite, so every exported symbol is moved behind a private prefix. Rather
//! than editing each declaration, a block of alias macros is spliced into the
//! public header directly after its include guard:
//!
//! ```c
//! #define SQLITE3_H
//!
//! #define sqlite3_close ccdc_sqlite3_close
//! #define sqlite3_open ccdc_sqlite3_open
//!
//! /* rest of the header */
//! ```
//!
//! The preprocessor then rewrites every use of the public names, in the
//! header itself and in any translation unit that includes it. The
//! implementation text is never edited. The one exception is the interactive
//! shell source, which references a handful of Windows helper functions that
//! never appear in the header; those are renamed by exact substitution from a
//! fixed table.
//!
//! Everything here is pure text-to-text; reading and writing the actual
//! files is the workshop's job.

mod header;
mod rules;
mod scan;
mod shell;

pub use header::{insert_directives, rename_exports};
pub use rules::RenameRules;
pub use scan::scan_exports;
pub use shell::{SHELL_RENAMES, rename_shell_symbols};
