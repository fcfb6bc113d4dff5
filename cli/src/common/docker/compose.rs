//! # Compose Front-End
//!
//! File: cli/src/common/docker/compose.rs
//!
//! The stack is managed as one unit by docker compose. Newer installs ship it as
//! the `docker compose` plugin; older ones as the standalone `docker-compose`
//! binary. [`detect`] picks whichever is available, preferring the plugin.
//!
use crate::common::process::{quote, CommandRunner};
use crate::common::system::tools;
use crate::core::error::{DevstackError, Result};
use tracing::debug;

const PLUGIN: &str = "docker compose";
const STANDALONE: &str = "docker-compose";

/// The compose program prefix, e.g. `docker compose`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compose {
    program: String,
}

impl Compose {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// `<program> <args>`; `args` is inserted verbatim.
    pub fn cmd(&self, args: &str) -> String {
        let args = args.trim();
        if args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, args)
        }
    }

    /// `<program> <action> <service>`, with the service name quoted.
    pub fn service_cmd(&self, action: &str, service: &str) -> Result<String> {
        Ok(format!("{} {} {}", self.program, action, quote(service)?))
    }
}

impl Default for Compose {
    fn default() -> Self {
        Self::new(PLUGIN)
    }
}

/// Finds a usable compose front-end.
pub async fn detect<R: CommandRunner>(runner: &R) -> Result<Compose> {
    let version = runner
        .capture_lenient(&format!("{} version", PLUGIN), None)
        .await
        .unwrap_or_default();
    if !version.trim().is_empty() {
        debug!("Using compose plugin: {}", version.trim());
        return Ok(Compose::new(PLUGIN));
    }
    if tools::is_on_path(runner, STANDALONE).await {
        debug!("Using standalone {}", STANDALONE);
        return Ok(Compose::new(STANDALONE));
    }
    Err(DevstackError::ComposeUnavailable.into())
}
