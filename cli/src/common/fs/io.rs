//! # devstack Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` that attach context to every error, plus the
//! few filesystem decisions the commands need to make:
//!
//! - **`ensure_dir_exists`**: `mkdir -p`, refusing paths that exist as files.
//! - **`read_file_to_string`** / **`write_string_to_file`** / **`append_to_file`**.
//! - **`dir_has_entries`**: used to decide whether `init` is a re-initialisation.
//! - **`remove_dir`**: removes a tree and reports *why* it could not, so setup can
//!   fall back to a root-owned container when bind-mount files are not ours.
//! - **`display_relative`**: root-relative paths for user-facing messages.
//! - **`backup_file`**: copies a file aside with a timestamp suffix before it is
//!   overwritten.
//!
use crate::core::error::{DevstackError, Result};
use anyhow::Context;
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Ensures that a directory exists at `path`, creating parents as needed.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creation fails.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(DevstackError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Writes `content` to `path`, replacing any existing file. Parent directories
/// are created first.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    info!("Wrote content to file: {:?}", path);
    Ok(())
}

/// Appends `content` to `path`, creating the file if it does not exist.
pub fn append_to_file(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {:?} for appending", path))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to append to file {:?}", path))?;
    debug!("Appended {} bytes to {:?}", content.len(), path);
    Ok(())
}

/// Whether `path` is a directory with at least one entry.
pub fn dir_has_entries(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Result of [`remove_dir`].
#[derive(Debug)]
pub enum Removal {
    /// The tree is gone (or was never there).
    Removed,
    /// The host user may not delete some entries.
    PermissionDenied,
}

/// Recursively removes `path`.
///
/// A missing path counts as removed. Permission errors are reported as
/// [`Removal::PermissionDenied`] rather than `Err` so callers can retry by
/// other means; every other failure is an `Err`.
pub fn remove_dir(path: &Path) -> Result<Removal> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            info!("Removed directory: {:?}", path);
            Ok(Removal::Removed)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Nothing to remove at {:?}", path);
            Ok(Removal::Removed)
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            debug!("Permission denied removing {:?}: {}", path, e);
            Ok(Removal::PermissionDenied)
        }
        Err(e) => Err(DevstackError::FileSystem(format!(
            "Failed to remove directory {:?}: {}",
            path, e
        ))
        .into()),
    }
}

/// `path` relative to `base` for messages, or `path` itself when unrelated.
pub fn display_relative(path: &Path, base: &Path) -> String {
    pathdiff::diff_paths(path, base)
        .filter(|rel| !rel.as_os_str().is_empty() && !rel.starts_with(".."))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

/// Copies `path` to `<path>.backup.<YYYYmmdd_HHMMSS>` and returns the copy's path.
pub fn backup_file(path: &Path) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".backup.{}", stamp));
    let backup = PathBuf::from(name);
    fs::copy(path, &backup)
        .with_context(|| format!("Failed to back up {:?} to {:?}", path, backup))?;
    info!("Backed up {:?} to {:?}", path, backup);
    Ok(backup)
}
