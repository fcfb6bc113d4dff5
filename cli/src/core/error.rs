//! # devstack Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the `dev` CLI. Every
//! command handler returns [`Result`], an alias for `anyhow::Result`, so
//! handlers can attach context with `.context(...)` while still raising one of
//! the specific [`DevstackError`] variants when the failure belongs to a known
//! category.
//!
//! ## Categories
//!
//! - **Environment unavailable**: the container engine or its compose front-end
//!   is missing or not running. Raised by the preflight check in `main.rs`
//!   before any command is dispatched.
//! - **Configuration**: `projects.yml` absent or malformed, unknown project id,
//!   missing files the command depends on.
//! - **External command failure**: a subprocess exited non-zero in the middle of
//!   a multi-step procedure. Carries which step failed.
//! - **Readiness timeout**: the fixed poll budget ran out before a container
//!   reported `running`.
//!
//! A declined confirmation prompt is *not* an error; handlers report the
//! cancellation and return `Ok(())`.
//!
//! ```rust
//! if !known.contains_key(id) {
//!     return Err(DevstackError::UnknownProject {
//!         name: id.to_string(),
//!         known: known.keys().cloned().collect(),
//!     })?;
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the `dev` CLI.
#[derive(Error, Debug)]
pub enum DevstackError {
    #[error("Docker is not installed or not on PATH. Install it from https://docs.docker.com/get-docker/")]
    EngineNotInstalled,

    #[error("Docker daemon is not running. Start Docker and try again.")]
    EngineNotRunning,

    #[error("Docker Compose is not available (tried `docker compose` and `docker-compose`).")]
    ComposeUnavailable,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown project '{name}'. Known projects: {}", known.join(", "))]
    UnknownProject { name: String, known: Vec<String> },

    #[error("No repository URL provided for project '{project}' (set {variable} in .env).")]
    MissingRepositoryUrl { project: String, variable: String },

    #[error("Required file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("{context} failed: {cmd}")]
    ExternalCommand { context: String, cmd: String },

    #[error("Setup step {index}/{total} failed: {command}")]
    StepFailed {
        index: usize,
        total: usize,
        command: String,
    },

    #[error("Container '{container}' did not report running after {attempts} attempts. Inspect it with `docker ps -a` and `dev logs`.")]
    ReadinessTimeout { container: String, attempts: u32 },

    #[error("Container '{name}' is not running. Start containers with: dev start")]
    ContainerNotRunning { name: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = DevstackError::Config("missing 'projects' key".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: missing 'projects' key"
        );

        let unknown = DevstackError::UnknownProject {
            name: "billing".into(),
            known: vec!["backend".into(), "frontend".into()],
        };
        assert_eq!(
            unknown.to_string(),
            "Unknown project 'billing'. Known projects: backend, frontend"
        );

        let step = DevstackError::StepFailed {
            index: 2,
            total: 3,
            command: "php bin/console doctrine:migrations:migrate".into(),
        };
        assert_eq!(
            step.to_string(),
            "Setup step 2/3 failed: php bin/console doctrine:migrations:migrate"
        );
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let err: anyhow::Error = DevstackError::ReadinessTimeout {
            container: "app-backend".into(),
            attempts: 30,
        }
        .into();
        assert!(matches!(
            err.downcast_ref::<DevstackError>(),
            Some(DevstackError::ReadinessTimeout { attempts: 30, .. })
        ));
    }
}
