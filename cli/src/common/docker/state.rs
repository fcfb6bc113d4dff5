//! # Docker State Queries
//!
//! File: cli/src/common/docker/state.rs
//!
//! ## Overview
//!
//! Questions asked of the engine before acting:
//!
//! - [`ensure_engine_available`]: is `docker` installed and is the daemon up?
//! - [`container_running`]: is a container with exactly this name listed by
//!   `docker ps`? Used before opening shells or running tools.
//! - [`container_reports_running`]: does `docker inspect` report
//!   `State.Running == true`? Used by the setup readiness poll.
//!
//! `docker ps --filter name=X` matches substrings (`symfony-php` also matches
//! `symfony-phpmyadmin`), so names are compared line by line.
//!
use crate::common::process::{quote, CommandRunner};
use crate::common::system::tools;
use crate::core::error::{DevstackError, Result};
use tracing::debug;

/// Fails unless `docker` is on PATH and `docker ps` succeeds.
pub async fn ensure_engine_available<R: CommandRunner>(runner: &R) -> Result<()> {
    if !tools::is_on_path(runner, "docker").await {
        return Err(DevstackError::EngineNotInstalled.into());
    }
    if runner.capture("docker ps", None).await.is_none() {
        return Err(DevstackError::EngineNotRunning.into());
    }
    Ok(())
}

/// Whether `docker ps` lists a running container named exactly `name`.
pub async fn container_running<R: CommandRunner>(runner: &R, name: &str) -> bool {
    let command = match quote(name) {
        Ok(q) => format!("docker ps --filter name={} --format '{{{{.Names}}}}'", q),
        Err(_) => return false,
    };
    let listed = runner.capture(&command, None).await.unwrap_or_default();
    let found = listed.lines().any(|line| line.trim() == name);
    debug!("Container '{}' running: {}", name, found);
    found
}

/// Whether `docker inspect` reports the container's state as running.
pub async fn container_reports_running<R: CommandRunner>(runner: &R, name: &str) -> bool {
    let command = match quote(name) {
        Ok(q) => format!("docker inspect -f '{{{{.State.Running}}}}' {}", q),
        Err(_) => return false,
    };
    matches!(runner.capture(&command, None).await.as_deref(), Some("true"))
}
