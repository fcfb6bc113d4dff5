//! # devstack Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers shared by the command handlers. Everything lives in the
//! `io` submodule; callers import it directly:
//!
//! ```rust
//! use crate::common::fs::io;
//! io::ensure_dir_exists(&mount)?;
//! match io::remove_dir(&repo)? { /* ... */ }
//! ```
//!

/// Basic file I/O, directory removal and backups.
pub mod io;
