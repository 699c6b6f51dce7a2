// src/workshop/mod.rs

//! Workshop: the build pipeline for recipes
//!
//! The Workshop drives one recipe from upstream archive to staged
//! installation. It handles:
//! - Fetching the source archive (checksum-verified, cached)
//! - Extracting it into a scratch directory
//! - Renaming the exported symbols in the unpacked tree
//! - Running the recipe's build and install commands with DESTDIR staged
//!
//! Build commands run directly as the invoking user through `sh -c`; the
//! tool is a build driver, not a sandbox.

mod archive;
mod patch;

pub use patch::{PatchOutcome, patch_source_tree};

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::recipe::Recipe;
use archive::{download_file, expected_sha256, extract_archive, file_sha256};

/// Configuration for the workshop
#[derive(Debug, Clone)]
pub struct WorkshopConfig {
    /// Directory for downloaded sources
    pub source_cache: PathBuf,
    /// Number of parallel jobs
    pub jobs: u32,
    /// Keep the scratch directory after completion (for debugging)
    pub keep_builddir: bool,
}

impl Default for WorkshopConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        Self {
            source_cache: PathBuf::from("/var/cache/ccdcsqlite3/sources"),
            jobs,
            keep_builddir: false,
        }
    }
}

/// Result of building a recipe
#[derive(Debug)]
pub struct BuildResult {
    /// Staged installation root (the package payload)
    pub package_root: PathBuf,
    /// What the patch phase did
    pub patch: PatchOutcome,
    /// Build log
    pub log: String,
    /// Warnings generated during the run
    pub warnings: Vec<String>,
    /// Scratch directory location, when keep_builddir is set
    pub scratch_dir: Option<PathBuf>,
}

/// The workshop: builds recipes into staged installations
pub struct Workshop {
    config: WorkshopConfig,
}

impl Workshop {
    /// Create a new Workshop with the given configuration
    pub fn new(config: WorkshopConfig) -> Self {
        Self { config }
    }

    /// Create a Workshop with default configuration
    pub fn with_defaults() -> Self {
        Self::new(WorkshopConfig::default())
    }

    /// Build a recipe and stage the installation under `output_dir`
    ///
    /// This is the main entry point for building from source.
    pub fn build(&self, recipe: &Recipe, output_dir: &Path) -> Result<BuildResult> {
        info!(
            "Building {} version {}",
            recipe.package.name, recipe.package.version
        );

        let mut job = Job::new(self, recipe)?;

        info!("Fetching source archive...");
        job.fetch()?;

        info!("Unpacking sources...");
        job.unpack()?;

        info!("Renaming exported symbols...");
        let patch = job.patch()?;

        info!("Running build commands...");
        job.compile()?;
        job.install()?;

        info!("Staging installation...");
        let package_root = job.stage(output_dir)?;

        let Job {
            build_dir,
            log,
            warnings,
            ..
        } = job;
        let scratch_dir = if self.config.keep_builddir {
            // Disabled events skip argument evaluation; into_path must run
            // unconditionally or the scratch tree is deleted on drop
            let kept = build_dir.into_path();
            info!("Scratch directory kept at {}", kept.display());
            Some(kept)
        } else {
            None
        };

        Ok(BuildResult {
            package_root,
            patch,
            log,
            warnings,
            scratch_dir,
        })
    }

    /// Fetch the recipe's source archive into the cache
    pub fn fetch(&self, recipe: &Recipe) -> Result<PathBuf> {
        self.fetch_source(&recipe.archive_url(), &recipe.source.checksum)
    }

    /// Whether the recipe's source archive is already cached
    pub fn source_cached(&self, recipe: &Recipe) -> bool {
        self.cache_path(&recipe.source.checksum).exists()
    }

    fn cache_path(&self, checksum: &str) -> PathBuf {
        self.config.source_cache.join(checksum.replace(':', "_"))
    }

    /// Fetch a source archive (with caching)
    fn fetch_source(&self, url: &str, checksum: &str) -> Result<PathBuf> {
        let expected = expected_sha256(checksum)?;

        fs::create_dir_all(&self.config.source_cache)?;
        let cached_path = self.cache_path(checksum);

        // Cache hits are re-verified; a corrupt file is thrown away
        if cached_path.exists() {
            if file_sha256(&cached_path)?.eq_ignore_ascii_case(expected) {
                debug!("Using cached source: {}", cached_path.display());
                return Ok(cached_path);
            }
            warn!("Cached file checksum mismatch, re-downloading");
            fs::remove_file(&cached_path)?;
        }

        info!("Downloading: {}", url);
        let temp_path = self
            .config
            .source_cache
            .join(format!("{}.tmp", checksum.replace(':', "_")));
        download_file(url, &temp_path)?;

        let actual = file_sha256(&temp_path)?;
        if !actual.eq_ignore_ascii_case(expected) {
            fs::remove_file(&temp_path)?;
            return Err(Error::ChecksumMismatch {
                expected: checksum.to_string(),
                actual: format!("sha256:{}", actual),
            });
        }

        fs::rename(&temp_path, &cached_path)?;
        Ok(cached_path)
    }
}

/// A single build job over its own scratch directory
struct Job<'a> {
    workshop: &'a Workshop,
    recipe: &'a Recipe,
    /// Scratch directory for the whole run
    build_dir: TempDir,
    /// Unpacked source tree within build_dir
    source_dir: PathBuf,
    /// Staging root the install command populates
    dest_dir: PathBuf,
    /// Build log accumulator
    log: String,
    /// Warnings
    warnings: Vec<String>,
}

impl<'a> Job<'a> {
    fn new(workshop: &'a Workshop, recipe: &'a Recipe) -> Result<Self> {
        let build_dir = TempDir::new()?;

        let source_dir = build_dir.path().join("source");
        let dest_dir = build_dir.path().join("destdir");

        fs::create_dir_all(&source_dir)?;
        fs::create_dir_all(&dest_dir)?;

        Ok(Self {
            workshop,
            recipe,
            build_dir,
            source_dir,
            dest_dir,
            log: String::new(),
            warnings: Vec::new(),
        })
    }

    /// Phase 1: fetch the source archive
    fn fetch(&mut self) -> Result<()> {
        let archive_url = self.recipe.archive_url();
        let archive_path = self
            .workshop
            .fetch_source(&archive_url, &self.recipe.source.checksum)?;

        // Copy into the scratch directory under its real filename so
        // extraction can dispatch on the extension
        let local_archive = self.build_dir.path().join(self.recipe.archive_filename());
        fs::copy(&archive_path, &local_archive)?;

        self.log_line(&format!("Fetched source: {}", archive_url));
        Ok(())
    }

    /// Phase 2: unpack the archive
    fn unpack(&mut self) -> Result<()> {
        let archive_path = self.build_dir.path().join(self.recipe.archive_filename());

        extract_archive(&archive_path, &self.source_dir)?;
        self.log_line(&format!(
            "Extracted source to {}",
            self.source_dir.display()
        ));

        // Archives usually carry a single top-level directory; descend into it
        let entries: Vec<_> = fs::read_dir(&self.source_dir)?
            .filter_map(|e| e.ok())
            .collect();

        if entries.len() == 1 && entries[0].file_type().map(|t| t.is_dir()).unwrap_or(false) {
            self.source_dir = entries[0].path();
            debug!("Source directory: {}", self.source_dir.display());
        }

        // Override with explicit extract_dir if specified
        if let Some(extract_dir) = &self.recipe.source.extract_dir {
            self.source_dir = self.build_dir.path().join("source").join(extract_dir);
            if !self.source_dir.is_dir() {
                return Err(Error::NotFound(format!(
                    "extract_dir {} not present after extraction",
                    self.source_dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Phase 3: rename the exported symbols in the unpacked tree
    fn patch(&mut self) -> Result<PatchOutcome> {
        let outcome = patch_source_tree(&self.source_dir, &self.recipe.patch)?;

        self.log_line(&format!(
            "Patched {}: {} exports found, {} directives inserted",
            self.recipe.patch.header, outcome.exports_found, outcome.directives_inserted
        ));
        for symbol in &outcome.shell_renames {
            self.log_line(&format!("Renamed shell symbol: {}", symbol));
        }

        Ok(outcome)
    }

    /// Phase 4: run configure and make
    fn compile(&mut self) -> Result<()> {
        let build = &self.recipe.build;
        let destdir = self.dest_dir.to_string_lossy().to_string();

        if let Some(configure) = &build.configure {
            let cmd = self.recipe.substitute(configure, &destdir);
            self.run_build_step("configure", &cmd)?;
        }

        if let Some(make) = &build.make {
            let cmd = self.recipe.substitute(make, &destdir);
            self.run_build_step("make", &cmd)?;
        }

        Ok(())
    }

    /// Phase 5: run the install command into the staging root
    fn install(&mut self) -> Result<()> {
        let build = &self.recipe.build;
        let destdir = self.dest_dir.to_string_lossy().to_string();

        if let Some(install) = &build.install {
            let cmd = self.recipe.substitute(install, &destdir);
            self.run_build_step("install", &cmd)?;
        } else {
            self.warnings
                .push("No install command; staging root will be empty".to_string());
        }

        Ok(())
    }

    /// Run one build command through `sh -c` in the source directory
    fn run_build_step(&mut self, phase: &str, command: &str) -> Result<()> {
        info!("Running {} phase", phase);
        debug!("Command: {}", command);

        let build = &self.recipe.build;
        let mut env: Vec<(&str, String)> = vec![
            ("DESTDIR", self.dest_dir.to_string_lossy().to_string()),
            (
                "MAKEFLAGS",
                format!("-j{}", build.jobs.unwrap_or(self.workshop.config.jobs)),
            ),
        ];
        for (key, value) in &build.environment {
            env.push((key, value.clone()));
        }

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.source_dir)
            .envs(env.iter().map(|(k, v)| (*k, v.as_str())))
            .output()
            .map_err(|e| Error::BuildFailed {
                phase: phase.to_string(),
                detail: format!("failed to run sh: {}", e),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        self.log_line(&format!("=== {} ===", phase));
        if !stdout.is_empty() {
            self.log.push_str(&stdout);
            self.log.push('\n');
        }
        if !stderr.is_empty() {
            self.log.push_str(&stderr);
            self.log.push('\n');
        }

        if !output.status.success() {
            return Err(Error::BuildFailed {
                phase: phase.to_string(),
                detail: format!(
                    "exit code {:?}\nstderr: {}",
                    output.status.code(),
                    stderr
                ),
            });
        }

        Ok(())
    }

    /// Phase 6: verify the staging root and copy it to the output directory
    fn stage(&mut self, output_dir: &Path) -> Result<PathBuf> {
        if fs::read_dir(&self.dest_dir)?.count() == 0 {
            return Err(Error::BuildFailed {
                phase: "install".to_string(),
                detail: "no files staged to destdir".to_string(),
            });
        }

        let root_name = format!(
            "{}-{}-{}",
            self.recipe.package.name, self.recipe.package.version, self.recipe.package.release
        );
        let package_root = output_dir.join(&root_name);

        // A stale root from an earlier run is replaced wholesale
        if package_root.exists() {
            fs::remove_dir_all(&package_root)?;
        }
        copy_tree(&self.dest_dir, &package_root)?;

        self.log_line(&format!("Staged installation: {}", package_root.display()));
        info!(
            "Staged {} at {}",
            self.recipe.package.name,
            package_root.display()
        );

        Ok(package_root)
    }

    fn log_line(&mut self, line: &str) {
        self.log.push_str(line);
        self.log.push('\n');
    }
}

/// Recursively copy a staged tree, preserving symlinks
fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            // fs::copy would follow the link; recreate the link itself
            #[cfg(unix)]
            {
                let link_target = fs::read_link(entry.path())?;
                std::os::unix::fs::symlink(link_target, &target)?;
            }

            #[cfg(not(unix))]
            {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "symlinks not supported on this platform",
                )));
            }
        } else if file_type.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
