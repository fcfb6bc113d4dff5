//! # Project Setup Procedure
//!
//! File: cli/src/commands/setup/procedure.rs
//!
//! ## Overview
//!
//! Resets a registered project to a fresh clone and bootstraps it:
//!
//! 1. Resolve the project id in `projects.yml`.
//! 2. Determine the repository URL from `.env` (`repo_env_var`), prompting when
//!    it is missing or still a template placeholder.
//! 3. Confirm, when the repository directory already exists and `--force` is
//!    not given. Declining ends the procedure before anything is touched.
//! 4. Stop the project's service and its related services (best effort).
//! 5. Delete the repository directory. Files created by containers are often
//!    owned by another uid; a permission error is retried through a throwaway
//!    container that deletes the directory as root.
//! 6. Create the mount directory and `git clone` into the repository directory.
//! 7. Start the services again (best effort).
//! 8. Poll until the container reports running ([`ReadinessPolicy`]).
//! 9. Run each setup step inside the container, stopping at the first failure.
//!
//! Nothing is rolled back on failure: re-running the command is the recovery
//! path. The mount directory itself is never removed.
//!
use crate::common::docker::{interaction, state};
use crate::common::fs::io::{self, Removal};
use crate::common::process::{quote, CommandRunner};
use crate::core::config::{self, ProjectConfig};
use crate::core::error::{DevstackError, Result};
use crate::core::placeholder::is_placeholder;
use crate::core::session::Session;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long to wait for a container to report running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            attempts: 30,
            interval: Duration::from_secs(2),
        }
    }
}

/// How a setup run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    Completed,
    /// The user declined the destructive confirmation; nothing was changed.
    Cancelled,
}

/// First attempt at deleting the repository directory from the host.
type RemoveDir = fn(&Path) -> Result<Removal>;

/// Runs the full procedure for `project_id`.
pub async fn run_setup<R: CommandRunner>(
    session: &Session<R>,
    project_id: &str,
    force: bool,
    policy: ReadinessPolicy,
) -> Result<SetupOutcome> {
    setup_with(session, project_id, force, policy, io::remove_dir).await
}

async fn setup_with<R: CommandRunner>(
    session: &Session<R>,
    project_id: &str,
    force: bool,
    policy: ReadinessPolicy,
    remove_dir: RemoveDir,
) -> Result<SetupOutcome> {
    let reporter = session.reporter();
    let root = session.root();

    let registry = config::load_registry(root)?;
    let project = registry.get(project_id)?;
    info!("Setting up project '{}' ({})", project_id, project.name);
    reporter.header(&format!("Setting up {}", project.name));

    let repo_url = resolve_repo_url(session, project_id, project)?;

    let repo_path = project.repo_path(root);
    let repo_display = io::display_relative(&repo_path, root);
    if repo_path.exists() && !force {
        reporter.warning(&format!(
            "{} already exists and will be deleted and re-cloned",
            repo_display
        ));
        if !session.prompter().confirm("Continue?")? {
            reporter.info("Setup cancelled");
            return Ok(SetupOutcome::Cancelled);
        }
    }

    reporter.info("Stopping services...");
    cycle_services(session, project, "stop", "stop").await?;

    if repo_path.exists() {
        reporter.info(&format!("Removing {}...", repo_display));
        remove_repository(session, project, remove_dir).await?;
    } else {
        debug!("{} does not exist, nothing to remove", repo_path.display());
    }

    let mount_path = project.mount_path(root);
    io::ensure_dir_exists(&mount_path)?;
    reporter.info(&format!("Cloning {}...", repo_url));
    let clone = format!(
        "git clone {} {}",
        quote(&repo_url)?,
        quote(&repo_path.to_string_lossy())?
    );
    if !session.runner().run(&clone, Some(root)).await {
        return Err(DevstackError::ExternalCommand {
            context: "Cloning repository".to_string(),
            cmd: clone,
        }
        .into());
    }
    reporter.success("Repository cloned");

    reporter.info("Starting services...");
    cycle_services(session, project, "up -d", "start").await?;

    wait_until_running(session, &project.container, policy).await?;

    run_steps(session, project).await?;

    reporter.header("Setup Complete!");
    reporter.success(&format!("{} is ready", project.name));
    Ok(SetupOutcome::Completed)
}

/// Runs `project.setup_steps` in order inside `project.container`.
///
/// An empty list is a successful no-op. The first failing step aborts the rest.
pub async fn run_steps<R: CommandRunner>(
    session: &Session<R>,
    project: &ProjectConfig,
) -> Result<()> {
    let reporter = session.reporter();
    let total = project.setup_steps.len();
    if total == 0 {
        reporter.info("No setup steps configured");
        return Ok(());
    }

    for (i, step) in project.setup_steps.iter().enumerate() {
        let index = i + 1;
        reporter.info(&format!("[{}/{}] {}", index, total, step));
        let command = interaction::step_command(&project.container, step)?;
        if !session.runner().run(&command, Some(session.root())).await {
            return Err(DevstackError::StepFailed {
                index,
                total,
                command: step.clone(),
            }
            .into());
        }
        reporter.success(&format!("Step {}/{} completed", index, total));
    }
    Ok(())
}

fn resolve_repo_url<R: CommandRunner>(
    session: &Session<R>,
    project_id: &str,
    project: &ProjectConfig,
) -> Result<String> {
    let env = session.load_env();
    if let Some(url) = env
        .get(&project.repo_env_var)
        .filter(|value| !is_placeholder(value))
    {
        debug!("Using {} from .env", project.repo_env_var);
        return Ok(url.clone());
    }

    session.reporter().info(&format!(
        "{} is not set in .env (or is still a placeholder)",
        project.repo_env_var
    ));
    let answer = session
        .prompter()
        .input(&format!("Repository URL for {}", project.name))?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(DevstackError::MissingRepositoryUrl {
            project: project_id.to_string(),
            variable: project.repo_env_var.clone(),
        }
        .into());
    }
    Ok(answer.to_string())
}

/// Runs `<compose> <action> <service>` for each service; failures only warn.
async fn cycle_services<R: CommandRunner>(
    session: &Session<R>,
    project: &ProjectConfig,
    action: &str,
    verb: &str,
) -> Result<()> {
    for service in project.services() {
        let command = session.compose().service_cmd(action, service)?;
        if !session.runner().run(&command, Some(session.root())).await {
            warn!("'{}' failed", command);
            session.reporter().warning(&format!(
                "Could not {} service '{}' (it may not be running)",
                verb, service
            ));
        }
    }
    Ok(())
}

async fn remove_repository<R: CommandRunner>(
    session: &Session<R>,
    project: &ProjectConfig,
    remove_dir: RemoveDir,
) -> Result<()> {
    let root = session.root();
    let repo_path = project.repo_path(root);
    match remove_dir(&repo_path)? {
        Removal::Removed => Ok(()),
        Removal::PermissionDenied => {
            session
                .reporter()
                .warning("Permission denied; removing through a container");
            remove_with_container(session, &project.mount_path(root), &project.repo_subdir)
                .await?;
            if repo_path.exists() {
                return Err(DevstackError::FileSystem(format!(
                    "{} still exists after container removal",
                    repo_path.display()
                ))
                .into());
            }
            Ok(())
        }
    }
}

async fn remove_with_container<R: CommandRunner>(
    session: &Session<R>,
    mount_path: &Path,
    subdir: &str,
) -> Result<()> {
    let command =
        interaction::removal_command(&session.settings().cleanup_image, mount_path, subdir)?;
    if session.runner().run(&command, Some(session.root())).await {
        Ok(())
    } else {
        Err(DevstackError::ExternalCommand {
            context: "Removing repository directory".to_string(),
            cmd: command,
        }
        .into())
    }
}

async fn wait_until_running<R: CommandRunner>(
    session: &Session<R>,
    container: &str,
    policy: ReadinessPolicy,
) -> Result<()> {
    session
        .reporter()
        .info(&format!("Waiting for container '{}' to be ready...", container));
    for attempt in 1..=policy.attempts {
        if state::container_reports_running(session.runner(), container).await {
            session
                .reporter()
                .success(&format!("Container '{}' is running", container));
            return Ok(());
        }
        debug!(
            "Container '{}' not running yet (attempt {}/{})",
            container, attempt, policy.attempts
        );
        if attempt < policy.attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }
    Err(DevstackError::ReadinessTimeout {
        container: container.to_string(),
        attempts: policy.attempts,
    }
    .into())
}
