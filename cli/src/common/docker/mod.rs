//! # devstack Docker Module Interface
//!
//! File: cli/src/common/docker/mod.rs
//!
//! ## Overview
//!
//! Docker is driven as an opaque external program: this module only *builds*
//! command lines and interprets their output. Execution always goes through the
//! [`CommandRunner`](crate::common::process::CommandRunner) port.
//!
//! ## Architecture
//!
//! - **`compose`**: detects the compose front-end (`docker compose` or the legacy
//!   `docker-compose`) and formats compose invocations.
//! - **`state`**: engine availability checks and container state queries
//!   (`docker ps`, `docker inspect`).
//! - **`interaction`**: `docker exec` / `docker run` command lines for shells,
//!   tool invocations, setup steps and the permission-fallback removal.
//!
//! ```rust
//! let compose = docker::compose::detect(&runner).await?;
//! runner.run(&compose.cmd("up -d"), Some(root)).await;
//! if docker::state::container_running(&runner, "symfony-php").await { /* ... */ }
//! ```
//!

/// Compose front-end detection and command formatting.
pub mod compose;
/// `docker exec` / `docker run` command builders.
pub mod interaction;
/// Engine checks and container state queries.
pub mod state;

pub use compose::Compose;
