//! # devstack Setup Commands
//!
//! File: cli/src/commands/setup/mod.rs
//!
//! ## Overview
//!
//! - `dev setup <project> [--force]` resets a project registered in
//!   `projects.yml` to a fresh clone and runs its setup steps. See
//!   [`procedure`] for the sequence.
//! - `dev setup-symfony` re-runs only the setup steps of the configured Symfony
//!   project (`stack.symfony_project`) against the existing checkout and the
//!   already-running container.
//!
//! ## Examples
//!
//! ```bash
//! dev setup symfony
//! dev setup frontend --force
//! dev setup-symfony
//! ```
//!
use crate::common::docker::state;
use crate::common::process::CommandRunner;
use crate::core::config;
use crate::core::error::{DevstackError, Result};
use crate::core::session::Session;
use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

/// The clone/reset/bootstrap sequence.
pub mod procedure;

pub use procedure::ReadinessPolicy;

#[derive(Parser, Debug)]
#[command(about = "Re-clone a project and run its setup steps")]
pub struct SetupArgs {
    /// Project id from projects.yml.
    pub project: String,

    /// Skip the confirmation when the repository directory already exists.
    #[arg(short, long)]
    pub force: bool,
}

pub async fn handle_setup<R: CommandRunner>(session: &Session<R>, args: SetupArgs) -> Result<()> {
    info!("Handling setup command...");
    debug!("Setup args: {:?}", args);
    let outcome =
        procedure::run_setup(session, &args.project, args.force, ReadinessPolicy::default())
            .await?;
    debug!("Setup of '{}' ended: {:?}", args.project, outcome);
    Ok(())
}

pub async fn handle_setup_symfony<R: CommandRunner>(session: &Session<R>) -> Result<()> {
    info!("Handling setup-symfony command...");
    let reporter = session.reporter();
    let project_id = &session.settings().symfony_project;
    let registry = config::load_registry(session.root())?;
    let project = registry.get(project_id)?;
    reporter.header(&format!("{} Project Setup", project.name));

    if !state::container_running(session.runner(), &project.container).await {
        return Err(DevstackError::ContainerNotRunning {
            name: project.container.clone(),
        }
        .into());
    }

    let repo_path = project.repo_path(session.root());
    if !repo_path.is_dir() {
        return Err(DevstackError::MissingFile { path: repo_path })
            .with_context(|| format!("Clone the project first with: dev setup {}", project_id));
    }

    procedure::run_steps(session, project).await?;
    reporter.header("Setup Complete!");
    reporter.success(&format!("{} setup steps finished", project.name));
    Ok(())
}
