// src/error.rs
//! Crate-wide error and result types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching, patching, or building a package
#[derive(Error, Debug)]
pub enum Error {
    /// Neither include-guard marker was found in the header
    #[error("no include-guard marker found in header (tried: {})", .tried.join(", "))]
    PatchTargetNotFound { tried: Vec<String> },

    /// The export scan matched zero declarations
    #[error("no exported declarations found (marker '{marker}', symbol prefix '{prefix}')")]
    ExportScanEmpty { marker: String, prefix: String },

    /// A rename-table symbol does not occur in its target file
    #[error("symbol '{symbol}' not found in {file}")]
    SymbolNotFound { symbol: String, file: String },

    /// Source archive failed checksum verification
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// Download failed
    #[error("download failed: {0}")]
    DownloadError(String),

    /// Recipe or checksum string could not be parsed
    #[error("parse error: {0}")]
    ParseError(String),

    /// A required file or directory is missing
    #[error("not found: {0}")]
    NotFound(String),

    /// A build phase exited nonzero
    #[error("{phase} failed: {detail}")]
    BuildFailed { phase: String, detail: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
