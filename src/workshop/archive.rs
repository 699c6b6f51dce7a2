// src/workshop/archive.rs

//! Download, checksum, and extraction helpers

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::process::Command;

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Download a file from a URL
pub(super) fn download_file(url: &str, dest: &Path) -> Result<()> {
    let output = Command::new("curl")
        .args(["-fsSL", "-o", dest.to_str().unwrap_or_default(), url])
        .output()
        .map_err(|e| Error::DownloadError(format!("curl failed: {}", e)))?;

    if !output.status.success() {
        return Err(Error::DownloadError(format!(
            "failed to download {}: {}",
            url,
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    Ok(())
}

/// Split a `sha256:<hex>` checksum string into its digest part
pub(super) fn expected_sha256(checksum: &str) -> Result<&str> {
    let (algorithm, digest) = checksum
        .split_once(':')
        .ok_or_else(|| Error::ParseError(format!("invalid checksum format: {}", checksum)))?;

    if algorithm != "sha256" {
        return Err(Error::ParseError(format!(
            "unsupported checksum algorithm: {} (supported: sha256)",
            algorithm
        )));
    }

    Ok(digest)
}

/// Hex SHA-256 digest of a file, streamed
pub(super) fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Extract an archive into `dest`, dispatching on the filename
pub(super) fn extract_archive(archive: &Path, dest: &Path) -> Result<()> {
    let filename = archive.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let archive_arg = archive.to_str().unwrap_or_default();
    let dest_arg = dest.to_str().unwrap_or_default();

    let (program, args): (&str, Vec<&str>) = if filename.ends_with(".zip") {
        ("unzip", vec!["-q", "-o", archive_arg, "-d", dest_arg])
    } else if filename.ends_with(".tar.gz") || filename.ends_with(".tgz") {
        ("tar", vec!["-xzf", archive_arg, "-C", dest_arg])
    } else if filename.ends_with(".tar.xz") || filename.ends_with(".txz") {
        ("tar", vec!["-xJf", archive_arg, "-C", dest_arg])
    } else if filename.ends_with(".tar.bz2") || filename.ends_with(".tbz2") {
        ("tar", vec!["-xjf", archive_arg, "-C", dest_arg])
    } else if filename.ends_with(".tar.zst") {
        ("tar", vec!["--zstd", "-xf", archive_arg, "-C", dest_arg])
    } else if filename.ends_with(".tar") {
        ("tar", vec!["-xf", archive_arg, "-C", dest_arg])
    } else {
        return Err(Error::ParseError(format!(
            "unknown archive format: {}",
            filename
        )));
    };

    let output = Command::new(program)
        .args(&args)
        .output()
        .map_err(|e| Error::BuildFailed {
            phase: "unpack".to_string(),
            detail: format!("failed to run {}: {}", program, e),
        })?;

    if !output.status.success() {
        return Err(Error::BuildFailed {
            phase: "unpack".to_string(),
            detail: format!(
                "{} failed: {}",
                program,
                String::from_utf8_lossy(&output.stderr)
            ),
        });
    }

    Ok(())
}
