//! # devstack Lifecycle Commands
//!
//! File: cli/src/commands/lifecycle.rs
//!
//! ## Overview
//!
//! Whole-stack operations, each a direct translation to one or a few compose
//! invocations run in the project root:
//!
//! | Command       | Compose invocation(s)                          |
//! |---------------|------------------------------------------------|
//! | `dev start`   | `start`                                        |
//! | `dev stop`    | `stop`                                         |
//! | `dev restart` | `restart`                                      |
//! | `dev down`    | `down` (after confirmation; volumes kept)      |
//! | `dev rebuild` | `down`, `build --no-cache`, `up -d` (confirmed)|
//! | `dev up`      | `up -d [--build]`, then `ps`                   |
//! | `dev status`  | `ps`                                           |
//!
//! Declining a confirmation is a cancellation, not an error.
//!
use crate::common::process::CommandRunner;
use crate::core::error::{DevstackError, Result};
use crate::core::session::Session;
use clap::Parser;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(about = "Create and start containers in the background")]
pub struct UpArgs {
    /// Build images before starting containers.
    #[arg(long)]
    pub build: bool,
}

pub async fn handle_start<R: CommandRunner>(session: &Session<R>) -> Result<()> {
    info!("Handling start command...");
    session.reporter().header("Starting Containers");
    session
        .compose_checked("start", "Starting containers")
        .await?;
    session
        .reporter()
        .success("All containers started successfully!");
    session.print_urls();
    Ok(())
}

pub async fn handle_stop<R: CommandRunner>(session: &Session<R>) -> Result<()> {
    info!("Handling stop command...");
    session.reporter().header("Stopping Containers");
    session
        .compose_checked("stop", "Stopping containers")
        .await?;
    session
        .reporter()
        .success("All containers stopped successfully!");
    Ok(())
}

pub async fn handle_restart<R: CommandRunner>(session: &Session<R>) -> Result<()> {
    info!("Handling restart command...");
    session.reporter().header("Restarting Containers");
    session
        .compose_checked("restart", "Restarting containers")
        .await?;
    session
        .reporter()
        .success("All containers restarted successfully!");
    Ok(())
}

pub async fn handle_down<R: CommandRunner>(session: &Session<R>) -> Result<()> {
    info!("Handling down command...");
    let reporter = session.reporter();
    reporter.header("Stopping and Removing Containers");
    reporter.warning(
        "This will stop and remove all containers (data volumes will be preserved)",
    );
    if !session.prompter().confirm("Continue?")? {
        reporter.info("Operation cancelled");
        return Ok(());
    }
    session
        .compose_checked("down", "Removing containers")
        .await?;
    reporter.success("Containers stopped and removed successfully!");
    Ok(())
}

pub async fn handle_rebuild<R: CommandRunner>(session: &Session<R>) -> Result<()> {
    info!("Handling rebuild command...");
    let reporter = session.reporter();
    reporter.header("Rebuilding Containers");
    reporter.warning("This will rebuild all containers from scratch (may take several minutes)");
    if !session.prompter().confirm("Continue?")? {
        reporter.info("Operation cancelled");
        return Ok(());
    }

    reporter.info("Stopping containers...");
    if !session.compose_run("down").await {
        debug!("compose down failed before rebuild; continuing");
    }
    reporter.info("Building containers (this may take a while)...");
    session
        .compose_checked("build --no-cache", "Building containers")
        .await?;
    reporter.info("Starting containers...");
    session
        .compose_checked("up -d", "Starting containers")
        .await?;
    reporter.success("Containers rebuilt and started successfully!");
    Ok(())
}

pub async fn handle_up<R: CommandRunner>(session: &Session<R>, args: UpArgs) -> Result<()> {
    info!("Handling up command (build: {})...", args.build);
    let reporter = session.reporter();
    reporter.header(if args.build {
        "Starting Containers with Rebuild"
    } else {
        "Starting Containers"
    });

    let env_path = session.env_path();
    if !env_path.exists() {
        reporter.info("Run 'dev init' first to initialize the environment");
        return Err(DevstackError::MissingFile { path: env_path }.into());
    }

    let compose_args = if args.build {
        reporter.info("Building and starting containers (this may take a few minutes)...");
        "up -d --build"
    } else {
        reporter.info("Starting containers...");
        "up -d"
    };
    session
        .compose_checked(compose_args, "Starting containers")
        .await?;
    reporter.success("Containers started successfully");

    reporter.info("Container Status:");
    session.compose_run("ps").await;
    session.print_urls();
    Ok(())
}

/// Shows `compose ps`. Reads nothing and writes nothing in the project root.
pub async fn handle_status<R: CommandRunner>(session: &Session<R>) -> Result<()> {
    info!("Handling status command...");
    session.reporter().header("Container Status");
    if !session.compose_run("ps").await {
        debug!("compose ps exited non-zero");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::testing::{FakeRunner, Reply};
    use crate::common::ui::testing::Answer;
    use crate::core::session::testing::test_session;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn snapshot(root: &Path) -> Vec<(String, Vec<u8>)> {
        let mut files: Vec<_> = fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().path())
            .map(|p| {
                let name = p.file_name().unwrap().to_string_lossy().to_string();
                (name, fs::read(&p).unwrap())
            })
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_up_args_parsing() {
        assert!(!UpArgs::try_parse_from(["up"]).unwrap().build);
        assert!(UpArgs::try_parse_from(["up", "--build"]).unwrap().build);
    }

    #[tokio::test]
    async fn test_start_prints_urls_on_success() {
        let dir = tempdir().unwrap();
        let t = test_session(dir.path(), FakeRunner::new(), []);
        handle_start(&t.session).await.unwrap();
        assert_eq!(t.runner.calls(), vec!["docker compose start"]);
        assert!(t.reporter.contains("All containers started successfully!"));
        assert!(t.reporter.contains("http://app.localhost"));
    }

    #[tokio::test]
    async fn test_stop_failure_is_error() {
        let dir = tempdir().unwrap();
        let runner = FakeRunner::new().on("stop", Reply::Fail);
        let t = test_session(dir.path(), runner, []);
        let err = handle_stop(&t.session).await.unwrap_err();
        assert!(err.to_string().contains("Stopping containers failed"));
    }

    #[tokio::test]
    async fn test_down_declined_runs_nothing() {
        let dir = tempdir().unwrap();
        let t = test_session(dir.path(), FakeRunner::new(), [Answer::Confirm(false)]);
        handle_down(&t.session).await.unwrap();
        assert!(t.runner.calls().is_empty());
        assert!(t.reporter.contains("Operation cancelled"));
    }

    #[tokio::test]
    async fn test_rebuild_sequence() {
        let dir = tempdir().unwrap();
        // A failing `down` does not stop the rebuild.
        let runner = FakeRunner::new().on("compose down", Reply::Fail);
        let t = test_session(dir.path(), runner, [Answer::Confirm(true)]);
        handle_rebuild(&t.session).await.unwrap();
        assert_eq!(
            t.runner.calls(),
            vec![
                "docker compose down",
                "docker compose build --no-cache",
                "docker compose up -d",
            ]
        );
    }

    #[tokio::test]
    async fn test_up_requires_env_file() {
        let dir = tempdir().unwrap();
        let t = test_session(dir.path(), FakeRunner::new(), []);
        let err = handle_up(&t.session, UpArgs { build: false }).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DevstackError>(),
            Some(DevstackError::MissingFile { .. })
        ));
        assert!(t.runner.calls().is_empty());
        assert!(t.reporter.contains("dev init"));
    }

    #[tokio::test]
    async fn test_up_with_build() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".env"), "APP_ENV=dev\n").unwrap();
        let t = test_session(dir.path(), FakeRunner::new(), []);
        handle_up(&t.session, UpArgs { build: true }).await.unwrap();
        assert_eq!(
            t.runner.calls(),
            vec!["docker compose up -d --build", "docker compose ps"]
        );
    }

    #[tokio::test]
    async fn test_status_leaves_files_untouched() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".env"), "GITHUB_REPO=git@host:org/api.git\n").unwrap();
        fs::write(dir.path().join("projects.yml"), "projects: {}\n").unwrap();
        fs::write(dir.path().join("aliases"), "alias dev='/path/to/dev-environment/dev'\n")
            .unwrap();
        let before = snapshot(dir.path());

        let t = test_session(dir.path(), FakeRunner::new(), []);
        handle_status(&t.session).await.unwrap();

        assert_eq!(t.runner.calls(), vec!["docker compose ps"]);
        assert_eq!(snapshot(dir.path()), before);
    }
}
