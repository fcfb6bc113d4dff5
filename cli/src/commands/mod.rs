//! # devstack Command Handlers
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per command family. Each exposes `handle_*` functions taking the
//! [`Session`](crate::core::session::Session) and, where the command has
//! options, a clap `*Args` struct. `main.rs` maps every `dev` subcommand to
//! exactly one handler.
//!
//! | Module      | Commands                                              |
//! |-------------|-------------------------------------------------------|
//! | `lifecycle` | start, stop, restart, down, rebuild, up, status       |
//! | `logs`      | logs                                                  |
//! | `exec`      | composer, symfony, npm                                |
//! | `shell`     | shell, mysql                                          |
//! | `setup`     | setup, setup-symfony                                  |
//! | `init`      | init                                                  |
//! | `nuke`      | nuke                                                  |
//! | `aliases`   | aliases                                               |
//!

/// Shell alias installation.
pub mod aliases;
/// Tool pass-through (composer, symfony console, npm).
pub mod exec;
/// First-run bootstrap.
pub mod init;
/// Whole-stack start/stop/rebuild/status.
pub mod lifecycle;
/// Log viewing.
pub mod logs;
/// Full Docker reset for the stack.
pub mod nuke;
/// Project re-clone and setup steps.
pub mod setup;
/// Interactive shells and the database client.
pub mod shell;
