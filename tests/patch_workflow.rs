// tests/patch_workflow.rs

//! End-to-end symbol rename workflow over an unpacked source tree.

use std::fs;
use std::path::Path;

use ccdcsqlite3::recipe::PatchSection;
use ccdcsqlite3::{parse_recipe, patch_source_tree, scan_exports, RenameRules};
use tempfile::TempDir;

const HEADER: &str = r#"/*
** Public interface to the SQLite library.
*/
#ifndef SQLITE3_H
#define SQLITE3_H
#include <stdarg.h>

SQLITE_API int sqlite3_open(
  const char *filename,
  sqlite3 **ppDb
);
SQLITE_API int sqlite3_close(sqlite3*);
SQLITE_API SQLITE_EXTERN char *sqlite3_data_directory;
SQLITE_API const char sqlite3_version[];
SQLITE_API const char *sqlite3_libversion(void);

#endif /* SQLITE3_H */
"#;

const IMPLEMENTATION: &str = r#"#include "sqlite3.h"
SQLITE_API int sqlite3_open(const char *filename, sqlite3 **ppDb){
  return 0;
}
SQLITE_API int sqlite3_close(sqlite3 *db){ return 0; }
"#;

const SHELL: &str = r#"#include "sqlite3.h"
extern char *sqlite3_win32_unicode_to_utf8(LPCWSTR z);
extern char *sqlite3_win32_mbcs_to_utf8_v2(const char *z, int useAnsi);
extern char *sqlite3_win32_utf8_to_mbcs_v2(const char *z, int useAnsi);
extern LPWSTR sqlite3_win32_utf8_to_unicode(const char *z);

static void winPathToUtf8(void){
  sqlite3_win32_unicode_to_utf8(0);
  sqlite3_win32_mbcs_to_utf8_v2(0, 0);
  sqlite3_win32_utf8_to_mbcs_v2(0, 0);
  sqlite3_win32_utf8_to_unicode(0);
}
"#;

fn write_tree(dir: &Path) {
    fs::write(dir.join("sqlite3.h"), HEADER).unwrap();
    fs::write(dir.join("sqlite3.c"), IMPLEMENTATION).unwrap();
    fs::write(dir.join("shell.c"), SHELL).unwrap();
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn test_patch_workflow_renames_tree() {
    let dir = TempDir::new().unwrap();
    write_tree(dir.path());

    let outcome = patch_source_tree(dir.path(), &PatchSection::default()).unwrap();

    assert_eq!(outcome.exports_found, 5);
    assert_eq!(outcome.directives_inserted, 5);
    assert_eq!(outcome.shell_renames.len(), 4);

    // The directive block sits right after the include guard, sorted
    let header = fs::read_to_string(dir.path().join("sqlite3.h")).unwrap();
    let guard = header.find("#define SQLITE3_H").unwrap();
    let mut last = guard;
    for name in [
        "sqlite3_close",
        "sqlite3_data_directory",
        "sqlite3_libversion",
        "sqlite3_open",
        "sqlite3_version",
    ] {
        let directive = format!("#define {} ccdc_{}", name, name);
        let pos = header.find(&directive).unwrap();
        assert!(pos > last, "directive for {} out of order", name);
        last = pos;
    }
    // ...and before the declarations it aliases
    assert!(last < header.find("SQLITE_API int sqlite3_open").unwrap());

    // The implementation unit is read and written back byte for byte
    let implementation = fs::read_to_string(dir.path().join("sqlite3.c")).unwrap();
    assert_eq!(implementation, IMPLEMENTATION);

    // Every shell occurrence now carries the prefix
    let shell = fs::read_to_string(dir.path().join("shell.c")).unwrap();
    for symbol in &outcome.shell_renames {
        assert_eq!(count(&shell, &format!("ccdc_{}", symbol)), 2);
        assert_eq!(count(&shell, symbol), 2);
    }

    // No stray temp files from the write-back
    let leftovers: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains("tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_patch_workflow_second_run_is_noop() {
    let dir = TempDir::new().unwrap();
    write_tree(dir.path());

    patch_source_tree(dir.path(), &PatchSection::default()).unwrap();
    let header = fs::read_to_string(dir.path().join("sqlite3.h")).unwrap();
    let shell = fs::read_to_string(dir.path().join("shell.c")).unwrap();

    let outcome = patch_source_tree(dir.path(), &PatchSection::default()).unwrap();

    assert_eq!(outcome.exports_found, 5);
    assert_eq!(outcome.directives_inserted, 0);
    assert!(outcome.shell_renames.is_empty());

    // Files converge: run two changes nothing
    assert_eq!(
        fs::read_to_string(dir.path().join("sqlite3.h")).unwrap(),
        header
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("shell.c")).unwrap(),
        shell
    );
}

#[test]
fn test_patch_workflow_missing_guard_keeps_tree_pristine() {
    let dir = TempDir::new().unwrap();
    write_tree(dir.path());

    // Strip the guard so the header transform fails
    let broken = HEADER.replace("#define SQLITE3_H", "#define OTHER_GUARD");
    fs::write(dir.path().join("sqlite3.h"), &broken).unwrap();

    let err = patch_source_tree(dir.path(), &PatchSection::default());
    assert!(err.is_err());

    // Nothing on disk changed, shell.c included
    assert_eq!(
        fs::read_to_string(dir.path().join("sqlite3.h")).unwrap(),
        broken
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("sqlite3.c")).unwrap(),
        IMPLEMENTATION
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("shell.c")).unwrap(),
        SHELL
    );
}

#[test]
fn test_patch_workflow_recipe_rules_override() {
    let recipe = parse_recipe(
        r#"
[package]
name = "ccdcsqlite3"
version = "3.32.3"

[source]
archive = "https://www.sqlite.org/2020/sqlite-amalgamation-3320300.zip"
checksum = "sha256:e9cec01d4519e2d49b3810615237325263fe1feaceae390ee12b4a29bd73dbe2"

[patch.rules]
alias_prefix = "priv_"
"#,
    )
    .unwrap();

    let dir = TempDir::new().unwrap();
    write_tree(dir.path());

    let outcome = patch_source_tree(dir.path(), &recipe.patch).unwrap();
    assert_eq!(outcome.directives_inserted, 5);

    let header = fs::read_to_string(dir.path().join("sqlite3.h")).unwrap();
    assert!(header.contains("#define sqlite3_open priv_sqlite3_open"));
    assert!(!header.contains("ccdc_sqlite3_open"));

    let shell = fs::read_to_string(dir.path().join("shell.c")).unwrap();
    assert!(shell.contains("priv_sqlite3_win32_utf8_to_unicode"));
}

#[test]
fn test_scan_reports_sorted_exports() {
    let names = scan_exports(HEADER, &RenameRules::default()).unwrap();

    assert_eq!(
        names,
        vec![
            "sqlite3_close",
            "sqlite3_data_directory",
            "sqlite3_libversion",
            "sqlite3_open",
            "sqlite3_version",
        ]
    );
}
