//! # devstack System Utilities (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//!
//! ## Overview
//!
//! Host-side inspection used by preflight checks, `init` and `aliases`:
//!
//! - **`tools`**: whether an executable is available on `PATH`.
//! - **`shell`**: which interactive shell the user runs and which rc file it reads.
//! - **`user`**: the host user and group ids, written into `.env` so containers
//!   create files owned by the developer.
//!

/// Shell detection and rc file resolution.
pub mod shell;
/// External tool lookup.
pub mod tools;
/// Host user and group ids.
pub mod user;
