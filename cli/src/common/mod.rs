//! # devstack Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared infrastructure used by the command handlers. Command-specific logic
//! lives in `commands::`; configuration and error types live in `core::`.
//!
//! - **`docker`**: compose detection, container state queries and `docker exec`
//!   command builders.
//! - **`fs`**: filesystem I/O with contextual errors.
//! - **`process`**: the [`CommandRunner`](process::CommandRunner) port and its
//!   shell-backed implementation.
//! - **`system`**: tool lookup, shell detection, host ids.
//! - **`ui`**: user-facing output and confirmation prompts.
//!

/// Docker and docker compose command construction and state queries.
pub mod docker;
/// Filesystem operations.
pub mod fs;
/// External process execution.
pub mod process;
/// Host system inspection.
pub mod system;
/// Terminal output and prompts.
pub mod ui;
