//! # devstack Environment Bootstrap
//!
//! File: cli/src/commands/init.rs
//!
//! ## Overview
//!
//! `dev init` takes a fresh checkout of the environment to a running stack:
//!
//! 1. If the first bootstrap project already has content, ask whether to
//!    reinitialise (existing code is never deleted).
//! 2. Create `.env` from `.env.example` when missing.
//! 3. Append the host `USER_ID` / `GROUP_ID` unless `.env` already sets them.
//! 4. For each bootstrap project: clone it when its directory is empty and a
//!    URL is known (from `.env`, or asked for), otherwise create the empty
//!    directory for a manual clone later. Clone failures only warn.
//! 5. `compose build`, `compose up -d`, then a fixed settle delay.
//! 6. `composer install` in the PHP container when the first project has a
//!    dependency manifest (failure only warns).
//! 7. Install shell aliases (failure only warns).
//!
use crate::commands::aliases::{self, AliasOutcome, AliasTarget};
use crate::common::docker::interaction;
use crate::common::fs::io;
use crate::common::process::{quote, CommandRunner};
use crate::common::system::{shell, user};
use crate::core::config::BootstrapProject;
use crate::core::env_file::{parse_env_str, EnvMap, ENV_TEMPLATE_FILENAME};
use crate::core::error::{DevstackError, Result};
use crate::core::placeholder::is_placeholder;
use crate::core::session::Session;
use anyhow::Context;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Delay after `compose up -d` before running commands in containers.
const SETTLE_DELAY: Duration = Duration::from_secs(5);

const USEFUL_COMMANDS: &[&str] = &[
    "  * dev status          - View container status",
    "  * dev logs -f         - Follow all logs",
    "  * dev composer [cmd]  - Run Composer commands",
    "  * dev symfony [cmd]   - Run Symfony console",
    "  * dev npm [cmd]       - Run NPM commands",
    "  * dev shell [service] - Open shell in container",
    "  * dev mysql           - Open MySQL CLI",
];

/// Host-specific inputs to the bootstrap, separated out for tests.
#[derive(Debug, Clone, Copy)]
pub struct InitOptions<'a> {
    pub settle: Duration,
    pub aliases: AliasTarget<'a>,
}

pub async fn handle_init<R: CommandRunner>(session: &Session<R>) -> Result<()> {
    info!("Handling init command...");
    let home = dirs::home_dir().context("Could not find home directory")?;
    let binary = std::env::current_exe().context("Could not resolve the path of this binary")?;
    let options = InitOptions {
        settle: SETTLE_DELAY,
        aliases: AliasTarget {
            home: &home,
            binary: &binary,
            shell: shell::detect_shell(),
        },
    };
    run_init(session, options).await
}

pub async fn run_init<R: CommandRunner>(
    session: &Session<R>,
    options: InitOptions<'_>,
) -> Result<()> {
    let reporter = session.reporter();
    let root = session.root();
    let settings = session.settings();
    reporter.header("Initializing Development Environment");

    if let Some(first) = settings.bootstrap_projects.first() {
        let dir = root.join(&first.dir);
        if io::dir_has_entries(&dir) {
            reporter.warning(&format!("{} already exists!", first.dir));
            if !session
                .prompter()
                .confirm("Reinitialize? This will NOT delete existing code.")?
            {
                reporter.info("Initialization cancelled");
                return Ok(());
            }
        }
    }

    prepare_env_file(session)?;
    record_host_ids(session)?;

    let env = session.load_env();
    for project in &settings.bootstrap_projects {
        bootstrap_project(session, project, &env).await?;
    }

    reporter.info("Building Docker containers (this may take several minutes)...");
    session
        .compose_checked("build", "Building containers")
        .await?;
    reporter.success("Containers built successfully");

    reporter.info("Starting containers...");
    session
        .compose_checked("up -d", "Starting containers")
        .await?;
    reporter.success("Containers started successfully");

    reporter.info("Waiting for containers to be ready...");
    tokio::time::sleep(options.settle).await;

    install_dependencies(session).await?;

    reporter.info("Installing bash aliases...");
    match aliases::install_aliases(root, options.aliases, reporter, session.prompter()) {
        Ok(AliasOutcome::Installed) => {}
        Ok(AliasOutcome::Cancelled) => reporter.info("Kept existing aliases"),
        Err(e) => {
            warn!("Alias installation failed: {:#}", e);
            reporter.warning(&format!("Failed to install bash aliases: {}", e));
            reporter.info("You can install them manually with: dev aliases");
        }
    }

    reporter.header("Initialization Complete!");
    reporter.success("Development environment is ready!");
    session.print_urls();
    reporter.info("Useful commands:");
    for line in USEFUL_COMMANDS {
        reporter.plain(line);
    }
    reporter.info(&format!(
        "Reload your shell or run: source ~/{}",
        options.aliases.shell.rc_filename()
    ));
    Ok(())
}

fn prepare_env_file<R: CommandRunner>(session: &Session<R>) -> Result<()> {
    let reporter = session.reporter();
    let env_path = session.env_path();
    if env_path.exists() {
        reporter.info(".env file already exists");
        return Ok(());
    }
    let template = session.root().join(ENV_TEMPLATE_FILENAME);
    if !template.is_file() {
        return Err(DevstackError::MissingFile { path: template }.into());
    }
    reporter.info("Creating .env file from .env.example...");
    fs::copy(&template, &env_path)
        .with_context(|| format!("Failed to copy {:?} to {:?}", template, env_path))?;
    reporter.success(".env file created");
    Ok(())
}

fn record_host_ids<R: CommandRunner>(session: &Session<R>) -> Result<()> {
    let reporter = session.reporter();
    let Some(ids) = user::host_ids() else {
        debug!("Host ids unavailable on this platform");
        return Ok(());
    };
    reporter.success(&format!(
        "Detected USER_ID={}, GROUP_ID={}",
        ids.uid, ids.gid
    ));

    let env_path = session.env_path();
    let content = io::read_file_to_string(&env_path)?;
    if parse_env_str(&content).contains_key("USER_ID") {
        reporter.info("USER_ID and GROUP_ID already set in .env");
        return Ok(());
    }
    let mut addition = String::new();
    if !content.is_empty() && !content.ends_with('\n') {
        addition.push('\n');
    }
    addition.push_str("\n# Auto-detected user IDs\n");
    addition.push_str(&ids.env_lines());
    io::append_to_file(&env_path, &addition)?;
    reporter.success("Added USER_ID and GROUP_ID to .env");
    Ok(())
}

async fn bootstrap_project<R: CommandRunner>(
    session: &Session<R>,
    project: &BootstrapProject,
    env: &EnvMap,
) -> Result<()> {
    let reporter = session.reporter();
    let dir = session.root().join(&project.dir);
    if io::dir_has_entries(&dir) {
        reporter.info(&format!(
            "{} project directory already exists, skipping clone",
            project.label
        ));
        return Ok(());
    }

    let configured = project
        .repo_env_var
        .as_ref()
        .and_then(|var| env.get(var))
        .filter(|value| !is_placeholder(value))
        .cloned();
    let url = match configured {
        Some(url) => url,
        None => session
            .prompter()
            .input(&format!(
                "{} repository URL (or press Enter to skip)",
                project.label
            ))?
            .trim()
            .to_string(),
    };

    if url.is_empty() {
        reporter.warning(&format!("No {} repository URL provided", project.label));
        reporter.info(&format!(
            "You can manually clone your project into: {}",
            project.dir
        ));
        return io::ensure_dir_exists(&dir);
    }

    if let Some(parent) = dir.parent() {
        io::ensure_dir_exists(parent)?;
    }
    reporter.info(&format!("Cloning {} repository: {}", project.label, url));
    if clone(session, &url, &dir).await? {
        reporter.success(&format!("{} repository cloned successfully", project.label));
    } else {
        reporter.error(&format!("Failed to clone {} repository", project.label));
        reporter.info(&format!("You can manually clone later into: {}", project.dir));
    }
    Ok(())
}

async fn clone<R: CommandRunner>(session: &Session<R>, url: &str, dir: &Path) -> Result<bool> {
    let command = format!(
        "git clone {} {}",
        quote(url)?,
        quote(&dir.to_string_lossy())?
    );
    Ok(session.runner().run(&command, Some(session.root())).await)
}

async fn install_dependencies<R: CommandRunner>(session: &Session<R>) -> Result<()> {
    let reporter = session.reporter();
    let settings = session.settings();
    let Some(first) = settings.bootstrap_projects.first() else {
        return Ok(());
    };
    let manifest = session
        .root()
        .join(&first.dir)
        .join(&settings.dependency_manifest);
    if !manifest.is_file() {
        reporter.info(&format!(
            "No {} found, skipping composer install",
            settings.dependency_manifest
        ));
        return Ok(());
    }

    reporter.info("Running composer install...");
    let command = interaction::exec_command("", &settings.php_container, "composer install")?;
    if session.runner().run(&command, Some(session.root())).await {
        reporter.success("Composer dependencies installed");
    } else {
        reporter.warning("Composer install failed or was skipped");
        reporter.info("You can run it manually with: dev composer install");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::testing::{FakeRunner, Reply};
    use crate::common::system::shell::ShellKind;
    use crate::common::ui::testing::Answer;
    use crate::core::session::testing::test_session;
    use tempfile::tempdir;

    fn options<'a>(home: &'a Path, binary: &'a Path) -> InitOptions<'a> {
        InitOptions {
            settle: Duration::ZERO,
            aliases: AliasTarget {
                home,
                binary,
                shell: ShellKind::Bash,
            },
        }
    }

    #[tokio::test]
    async fn test_init_fresh_checkout() {
        let root = tempdir().unwrap();
        let home = tempdir().unwrap();
        let binary = root.path().join("dev");
        fs::write(
            root.path().join(".env.example"),
            "GITHUB_REPO=git@github.com:yourusername/api.git\nVUE_REPO=\n",
        )
        .unwrap();
        let t = test_session(
            root.path(),
            FakeRunner::new(),
            [
                Answer::Text("git@host:team/api.git".into()),
                Answer::Text(String::new()),
            ],
        );

        run_init(&t.session, options(home.path(), &binary)).await.unwrap();

        let env = fs::read_to_string(root.path().join(".env")).unwrap();
        assert!(env.starts_with("GITHUB_REPO=git@github.com:yourusername/api.git\n"));
        #[cfg(unix)]
        assert!(env.contains("\n# Auto-detected user IDs\nUSER_ID="));

        let api_dir = root.path().join("projects/symfony-api");
        assert_eq!(
            t.runner.calls(),
            vec![
                format!("git clone git@host:team/api.git {}", api_dir.display()),
                "docker compose build".to_string(),
                "docker compose up -d".to_string(),
            ]
        );
        // Skipped project gets an empty directory for a later manual clone.
        assert!(root.path().join("projects/frontend").is_dir());
        // No aliases template in the root: warned, not fatal.
        assert!(t.reporter.contains("Failed to install bash aliases"));
        assert!(t.reporter.contains("Initialization Complete!"));
    }

    #[tokio::test]
    async fn test_init_requires_env_template() {
        let root = tempdir().unwrap();
        let home = tempdir().unwrap();
        let binary = root.path().join("dev");
        let t = test_session(root.path(), FakeRunner::new(), []);

        let err = run_init(&t.session, options(home.path(), &binary))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DevstackError>(),
            Some(DevstackError::MissingFile { .. })
        ));
        assert!(t.runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_init_reinitialize_declined() {
        let root = tempdir().unwrap();
        let home = tempdir().unwrap();
        let binary = root.path().join("dev");
        let api = root.path().join("projects/symfony-api");
        fs::create_dir_all(&api).unwrap();
        fs::write(api.join("composer.json"), "{}").unwrap();
        let t = test_session(root.path(), FakeRunner::new(), [Answer::Confirm(false)]);

        run_init(&t.session, options(home.path(), &binary)).await.unwrap();
        assert!(t.runner.calls().is_empty());
        assert!(!root.path().join(".env").exists());
        assert!(t.reporter.contains("Initialization cancelled"));
    }

    #[tokio::test]
    async fn test_init_existing_checkout_installs_dependencies() {
        let root = tempdir().unwrap();
        let home = tempdir().unwrap();
        let binary = root.path().join("dev");
        fs::write(root.path().join(".env"), "USER_ID=1000\nGROUP_ID=1000\n").unwrap();
        let api = root.path().join("projects/symfony-api");
        fs::create_dir_all(&api).unwrap();
        fs::write(api.join("composer.json"), "{}").unwrap();
        fs::write(
            root.path().join("aliases"),
            "alias dev='/path/to/dev-environment/dev'\n",
        )
        .unwrap();
        let runner = FakeRunner::new().on("composer install", Reply::Fail);
        let t = test_session(
            root.path(),
            runner,
            [
                Answer::Confirm(true),
                Answer::Text("https://git.internal/team/frontend.git".into()),
            ],
        );

        run_init(&t.session, options(home.path(), &binary)).await.unwrap();

        assert_eq!(
            fs::read_to_string(root.path().join(".env")).unwrap(),
            "USER_ID=1000\nGROUP_ID=1000\n"
        );
        assert_eq!(t.runner.count("git clone"), 1);
        assert_eq!(t.runner.count("frontend"), 1);
        assert_eq!(
            t.runner.calls().last().map(String::as_str),
            Some("docker exec symfony-php composer install")
        );
        assert!(t.reporter.contains("Composer install failed or was skipped"));
        let aliases = fs::read_to_string(home.path().join(".bash_aliases")).unwrap();
        assert_eq!(
            aliases,
            format!(
                "alias dev='{} --root {}'\n",
                binary.display(),
                root.path().display()
            )
        );
    }

    #[tokio::test]
    async fn test_init_build_failure_is_error() {
        let root = tempdir().unwrap();
        let home = tempdir().unwrap();
        let binary = root.path().join("dev");
        fs::write(root.path().join(".env"), "USER_ID=1\n").unwrap();
        let runner = FakeRunner::new().on("compose build", Reply::Fail);
        let t = test_session(root.path(), runner, [Answer::Text(String::new()), Answer::Text(String::new())]);

        let err = run_init(&t.session, options(home.path(), &binary))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Building containers failed"));
        assert_eq!(t.runner.count("up -d"), 0);
    }
}
