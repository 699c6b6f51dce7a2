// src/recipe.rs

//! Recipe file format and parsing
//!
//! A recipe is a TOML file describing one package build: where the upstream
//! archive lives, which files in the unpacked tree the symbol renamer
//! touches, and the command lines that build and install the result.
//!
//! # Example
//!
//! ```toml
//! [package]
//! name = "ccdcsqlite3"
//! version = "3.32.3"
//!
//! [source]
//! archive = "https://sqlite.org/2020/sqlite-amalgamation-3320300.zip"
//! checksum = "sha256:e9cec01d4519e2d49b3810615237325263fe1feaceae390ee12b4a29bd73dbe2"
//!
//! [build]
//! make = "cc -O2 -c sqlite3.c -o sqlite3.o && ar rcs libccdcsqlite3.a sqlite3.o"
//! install = "install -D libccdcsqlite3.a %(destdir)s/usr/lib/libccdcsqlite3.a"
//! ```
//!
//! `%(name)s`, `%(version)s`, and `%(destdir)s` are substituted into the
//! archive URL and the build commands, along with anything defined under
//! `[variables]`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rename::RenameRules;

/// A complete recipe for one package build
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Source archive and checksum
    pub source: SourceSection,

    /// Files the symbol renamer touches (defaults fit the SQLite
    /// amalgamation)
    #[serde(default)]
    pub patch: PatchSection,

    /// Build instructions
    #[serde(default)]
    pub build: BuildSection,

    /// Variables for substitution (optional)
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

impl Recipe {
    /// Substitute variables in a string
    ///
    /// Replaces `%(name)s` patterns with their values from:
    /// 1. Built-in variables (name, version, destdir)
    /// 2. Custom variables from the [variables] section
    pub fn substitute(&self, template: &str, destdir: &str) -> String {
        let mut result = template.to_string();

        // Built-in variables
        result = result.replace("%(version)s", &self.package.version);
        result = result.replace("%(name)s", &self.package.name);
        result = result.replace("%(destdir)s", destdir);

        // Custom variables
        for (key, value) in &self.variables {
            result = result.replace(&format!("%({})s", key), value);
        }

        result
    }

    /// Get the archive URL with variables substituted
    pub fn archive_url(&self) -> String {
        self.substitute(&self.source.archive, "")
    }

    /// Get the archive filename from the URL
    pub fn archive_filename(&self) -> String {
        self.archive_url()
            .split('/')
            .next_back()
            .unwrap_or("source.zip")
            .to_string()
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    /// Release number (for rebuilds of same version)
    #[serde(default = "default_release")]
    pub release: String,

    /// Short description
    #[serde(default)]
    pub summary: Option<String>,

    /// Homepage URL
    #[serde(default)]
    pub homepage: Option<String>,
}

fn default_release() -> String {
    "1".to_string()
}

/// Source archive section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Source archive URL
    ///
    /// Supports `%(version)s` substitution.
    pub archive: String,

    /// Checksum for the archive (sha256:...)
    pub checksum: String,

    /// Directory name after extraction (if discovery should be skipped)
    #[serde(default)]
    pub extract_dir: Option<String>,
}

/// Files the symbol renamer touches, relative to the unpacked source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchSection {
    /// Public header receiving the alias directive block
    pub header: String,

    /// Implementation unit; read and written back unchanged
    pub implementation: String,

    /// Interactive shell source carrying the fixed rename table
    pub shell: String,

    /// Overrides for the export grammar and alias prefix
    pub rules: RenameRules,
}

impl Default for PatchSection {
    fn default() -> Self {
        Self {
            header: "sqlite3.h".to_string(),
            implementation: "sqlite3.c".to_string(),
            shell: "shell.c".to_string(),
            rules: RenameRules::default(),
        }
    }
}

/// Build instructions section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSection {
    /// Configure command (optional)
    ///
    /// Supports `%(variable)s` substitution.
    #[serde(default)]
    pub configure: Option<String>,

    /// Make/build command (optional)
    #[serde(default)]
    pub make: Option<String>,

    /// Install command (optional)
    ///
    /// Must install to `%(destdir)s`.
    #[serde(default)]
    pub install: Option<String>,

    /// Environment variables to set during build
    #[serde(default)]
    pub environment: HashMap<String, String>,

    /// Number of parallel jobs (default: auto)
    #[serde(default)]
    pub jobs: Option<u32>,
}

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::NotFound(format!("recipe file {}: {}", path.display(), e)))?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Structural problems are errors; softer issues come back as warnings.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if recipe.package.name.is_empty() {
        return Err(Error::ParseError("recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::ParseError("recipe package version cannot be empty".to_string()));
    }

    // Only sha256 checksums are verifiable
    if !recipe.source.checksum.starts_with("sha256:") {
        return Err(Error::ParseError(format!(
            "invalid checksum format: {}. Expected sha256:...",
            recipe.source.checksum
        )));
    }

    // Patch targets must stay inside the unpacked tree
    for target in [
        &recipe.patch.header,
        &recipe.patch.implementation,
        &recipe.patch.shell,
    ] {
        if Path::new(target).is_absolute() {
            return Err(Error::ParseError(format!(
                "patch target must be relative to the source tree: {}",
                target
            )));
        }
    }

    // An empty literal collapses the rename into self-aliasing no-ops
    let rules = &recipe.patch.rules;
    for (field, value) in [
        ("export_marker", &rules.export_marker),
        ("symbol_prefix", &rules.symbol_prefix),
        ("alias_prefix", &rules.alias_prefix),
    ] {
        if value.is_empty() {
            return Err(Error::ParseError(format!(
                "patch rule {} cannot be empty",
                field
            )));
        }
    }
    if rules.guard_markers.is_empty() {
        return Err(Error::ParseError(
            "patch rules need at least one guard marker".to_string(),
        ));
    }

    if recipe.package.summary.is_none() {
        warnings.push("Missing package summary".to_string());
    }
    if recipe.build.make.is_none() && recipe.build.configure.is_none() {
        warnings.push("No build commands specified".to_string());
    }
    if recipe.build.install.is_none() {
        warnings.push("No install command specified".to_string());
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RECIPE: &str = r#"
[package]
name = "ccdcsqlite3"
version = "3.32.3"
summary = "Privately prefixed SQLite"
homepage = "https://www.sqlite.org"

[source]
archive = "https://sqlite.org/2020/sqlite-amalgamation-%(amalgamation)s.zip"
checksum = "sha256:e9cec01d4519e2d49b3810615237325263fe1feaceae390ee12b4a29bd73dbe2"

[build]
make = "cc -O2 -c sqlite3.c -o sqlite3.o && ar rcs lib%(name)s.a sqlite3.o"
install = "install -D lib%(name)s.a %(destdir)s/usr/lib/lib%(name)s.a"

[variables]
amalgamation = "3320300"
"#;

    #[test]
    fn test_parse_recipe() {
        let recipe = parse_recipe(SAMPLE_RECIPE).unwrap();

        assert_eq!(recipe.package.name, "ccdcsqlite3");
        assert_eq!(recipe.package.version, "3.32.3");
        assert_eq!(recipe.package.release, "1"); // default
        assert!(recipe.source.checksum.starts_with("sha256:"));
        assert!(recipe.build.make.is_some());
    }

    #[test]
    fn test_patch_defaults() {
        let recipe = parse_recipe(SAMPLE_RECIPE).unwrap();

        assert_eq!(recipe.patch.header, "sqlite3.h");
        assert_eq!(recipe.patch.implementation, "sqlite3.c");
        assert_eq!(recipe.patch.shell, "shell.c");
        assert_eq!(recipe.patch.rules, RenameRules::default());
    }

    #[test]
    fn test_patch_overrides() {
        let content = format!(
            "{SAMPLE_RECIPE}\n[patch]\nheader = \"src/sqlite3.h\"\n\n[patch.rules]\nalias_prefix = \"priv_\"\n"
        );
        let recipe = parse_recipe(&content).unwrap();

        assert_eq!(recipe.patch.header, "src/sqlite3.h");
        // Unset fields keep their defaults
        assert_eq!(recipe.patch.shell, "shell.c");
        assert_eq!(recipe.patch.rules.alias_prefix, "priv_");
        assert_eq!(recipe.patch.rules.export_marker, "SQLITE_API");
    }

    #[test]
    fn test_variable_substitution() {
        let recipe = parse_recipe(SAMPLE_RECIPE).unwrap();

        let url = recipe.archive_url();
        assert_eq!(url, "https://sqlite.org/2020/sqlite-amalgamation-3320300.zip");

        let install = recipe.substitute(recipe.build.install.as_ref().unwrap(), "/tmp/dest");
        assert!(install.contains("/tmp/dest/usr/lib/libccdcsqlite3.a"));
        assert!(!install.contains("%("));
    }

    #[test]
    fn test_archive_filename() {
        let recipe = parse_recipe(SAMPLE_RECIPE).unwrap();
        assert_eq!(recipe.archive_filename(), "sqlite-amalgamation-3320300.zip");
    }

    #[test]
    fn test_parse_invalid_toml() {
        assert!(parse_recipe("this is not valid toml at all {}").is_err());
    }

    #[test]
    fn test_validate_empty_name() {
        let content = SAMPLE_RECIPE.replace("name = \"ccdcsqlite3\"", "name = \"\"");
        let recipe = parse_recipe(&content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_bad_checksum() {
        let content = SAMPLE_RECIPE.replace("sha256:", "md5:");
        let recipe = parse_recipe(&content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_absolute_patch_target() {
        let content = format!("{SAMPLE_RECIPE}\n[patch]\nheader = \"/etc/passwd\"\n");
        let recipe = parse_recipe(&content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_empty_rename_rule_literals() {
        for field in ["export_marker", "symbol_prefix", "alias_prefix"] {
            let content = format!("{SAMPLE_RECIPE}\n[patch.rules]\n{field} = \"\"\n");
            let recipe = parse_recipe(&content).unwrap();
            assert!(
                validate_recipe(&recipe).is_err(),
                "empty {field} must be rejected"
            );
        }
    }

    #[test]
    fn test_validate_requires_guard_markers() {
        let content = format!("{SAMPLE_RECIPE}\n[patch.rules]\nguard_markers = []\n");
        let recipe = parse_recipe(&content).unwrap();
        assert!(validate_recipe(&recipe).is_err());
    }

    #[test]
    fn test_validate_warnings() {
        let content = r#"
[package]
name = "test"
version = "1.0"

[source]
archive = "https://example.com/test.zip"
checksum = "sha256:abc"
"#;
        let recipe = parse_recipe(content).unwrap();
        let warnings = validate_recipe(&recipe).unwrap();

        assert!(warnings.iter().any(|w| w.contains("summary")));
        assert!(warnings.iter().any(|w| w.contains("build")));
        assert!(warnings.iter().any(|w| w.contains("install")));
    }
}
