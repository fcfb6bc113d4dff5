//! # devstack Interactive Session Commands
//!
//! File: cli/src/commands/shell.rs
//!
//! ## Overview
//!
//! - `dev shell [service]` opens a shell in `<prefix>-<service>` (default
//!   service `php`). Images listed in `stack.sh_services` only ship `sh`; the
//!   others get `bash`.
//! - `dev mysql` opens the MySQL client in the database container with the
//!   credentials from `.env` (`MYSQL_USER`, `MYSQL_PASSWORD`, `MYSQL_DATABASE`,
//!   each defaulting to `symfony`).
//!
//! Both check that the container is running first and hand the terminal over
//! until the user exits. The exit status of the session itself is not treated
//! as a failure of `dev`.
//!
use crate::common::docker::{interaction, state};
use crate::common::process::{quote, CommandRunner};
use crate::core::error::{DevstackError, Result};
use crate::core::session::Session;
use clap::Parser;
use tracing::{debug, info};

const DEFAULT_DB_CREDENTIAL: &str = "symfony";

#[derive(Parser, Debug)]
#[command(about = "Open an interactive shell in a container")]
pub struct ShellArgs {
    /// Service to open (php, nginx, mysql, vue). Defaults to the configured default.
    pub service: Option<String>,
}

pub async fn handle_shell<R: CommandRunner>(session: &Session<R>, args: ShellArgs) -> Result<()> {
    info!("Handling shell command...");
    let settings = session.settings();
    let reporter = session.reporter();
    let service = args
        .service
        .unwrap_or_else(|| settings.default_shell_service.clone());
    reporter.header(&format!("Opening Shell: {}", service));

    let container = format!("{}-{}", settings.container_prefix, service);
    if !state::container_running(session.runner(), &container).await {
        reporter.info(&format!(
            "Available services: {}",
            settings.shell_services.join(", ")
        ));
        return Err(DevstackError::ContainerNotRunning { name: container }.into());
    }

    let shell = if settings.sh_services.iter().any(|s| *s == service) {
        "sh"
    } else {
        "bash"
    };
    let command = interaction::exec_command(interaction::tty_flags(), &container, shell)?;
    reporter.info(&format!("Running: {}", command));
    reporter.info("Type 'exit' to leave the shell");

    let ok = session.runner().run(&command, Some(session.root())).await;
    debug!("Shell session in '{}' ended (last status zero: {})", container, ok);
    Ok(())
}

pub async fn handle_mysql<R: CommandRunner>(session: &Session<R>) -> Result<()> {
    info!("Handling mysql command...");
    let settings = session.settings();
    let reporter = session.reporter();
    reporter.header("Opening MySQL CLI");

    let container = &settings.database_container;
    if !state::container_running(session.runner(), container).await {
        return Err(DevstackError::ContainerNotRunning {
            name: container.clone(),
        }
        .into());
    }

    let env = session.load_env();
    let credential = |key: &str| {
        env.get(key)
            .cloned()
            .unwrap_or_else(|| DEFAULT_DB_CREDENTIAL.to_string())
    };
    let user = credential("MYSQL_USER");
    let password = credential("MYSQL_PASSWORD");
    let database = credential("MYSQL_DATABASE");

    let client = format!(
        "mysql {} {} {}",
        quote(&format!("-u{}", user))?,
        quote(&format!("-p{}", password))?,
        quote(&database)?
    );
    let command = interaction::exec_command(interaction::tty_flags(), container, &client)?;
    reporter.info(&format!("Connecting to database: {}", database));
    reporter.info("Type 'exit' to leave MySQL CLI");

    let ok = session.runner().run(&command, Some(session.root())).await;
    debug!("MySQL session ended (last status zero: {})", ok);
    Ok(())
}
