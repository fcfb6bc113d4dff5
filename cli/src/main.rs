//! # devstack Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point of the `dev` binary. It:
//! - parses the command line with Clap
//! - sets up logging from the `-v` count (or `RUST_LOG`)
//! - checks that Docker and a compose front-end are usable (every command
//!   except `aliases`)
//! - builds the [`Session`] and routes to exactly one command handler
//! - prints any error and exits with status 1
//!
//! ## Examples
//!
//! ```bash
//! dev init
//! dev logs php -f
//! dev composer require symfony/orm-pack
//! dev --root ~/work/stack setup symfony --force
//! dev -vv status
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod common;
mod core;

use crate::commands::exec::{ExecArgs, Tool};
use crate::common::docker::{self, Compose};
use crate::common::process::ShellRunner;
use crate::common::ui::{ConsoleReporter, TerminalPrompter};
use crate::core::config;
use crate::core::error::Result;
use crate::core::session::Session;

#[derive(Parser, Debug)]
#[command(
    name = "dev",
    about = "Docker development environment manager",
    long_about = "Short commands for driving the local Docker Compose development stack:\n\
                  lifecycle, logs, shells, tool pass-through and project setup.",
    propagate_version = true,
    arg_required_else_help = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory containing docker-compose.yml, .env and projects.yml.
    /// Defaults to the nearest such directory above the `dev` binary.
    #[arg(long, global = true, env = "DEV_PROJECT_ROOT", value_name = "DIR")]
    root: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Initialize the development environment (first-time setup).
    Init,
    /// Start all containers.
    Start,
    /// Stop all containers.
    Stop,
    /// Restart all containers.
    Restart,
    /// Stop and remove containers (volumes are kept).
    Down,
    /// Rebuild all containers from scratch.
    Rebuild,
    Up(commands::lifecycle::UpArgs),
    /// Show container status.
    Status,
    Logs(commands::logs::LogsArgs),
    /// Run Composer inside the PHP container.
    Composer(ExecArgs),
    /// Run the Symfony console inside the PHP container.
    Symfony(ExecArgs),
    /// Run NPM inside the node container.
    Npm(ExecArgs),
    Shell(commands::shell::ShellArgs),
    /// Open the MySQL client in the database container.
    Mysql,
    Setup(commands::setup::SetupArgs),
    /// Re-run the Symfony project's setup steps.
    SetupSymfony,
    Nuke(commands::nuke::NukeArgs),
    /// Install shell aliases into ~/.bash_aliases.
    Aliases,
}

impl Commands {
    fn needs_docker(&self) -> bool {
        !matches!(self, Commands::Aliases)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let root = config::resolve_root(cli.root)?;
    let runner = ShellRunner;

    let compose = if cli.command.needs_docker() {
        docker::state::ensure_engine_available(&runner).await?;
        docker::compose::detect(&runner).await?
    } else {
        Compose::default()
    };

    let session = Session::new(
        root,
        compose,
        runner,
        Box::new(ConsoleReporter),
        Box::new(TerminalPrompter),
    );

    match cli.command {
        Commands::Init => commands::init::handle_init(&session).await,
        Commands::Start => commands::lifecycle::handle_start(&session).await,
        Commands::Stop => commands::lifecycle::handle_stop(&session).await,
        Commands::Restart => commands::lifecycle::handle_restart(&session).await,
        Commands::Down => commands::lifecycle::handle_down(&session).await,
        Commands::Rebuild => commands::lifecycle::handle_rebuild(&session).await,
        Commands::Up(args) => commands::lifecycle::handle_up(&session, args).await,
        Commands::Status => commands::lifecycle::handle_status(&session).await,
        Commands::Logs(args) => commands::logs::handle_logs(&session, args).await,
        Commands::Composer(args) => {
            commands::exec::handle_exec(&session, Tool::Composer, args).await
        }
        Commands::Symfony(args) => commands::exec::handle_exec(&session, Tool::Symfony, args).await,
        Commands::Npm(args) => commands::exec::handle_exec(&session, Tool::Npm, args).await,
        Commands::Shell(args) => commands::shell::handle_shell(&session, args).await,
        Commands::Mysql => commands::shell::handle_mysql(&session).await,
        Commands::Setup(args) => commands::setup::handle_setup(&session, args).await,
        Commands::SetupSymfony => commands::setup::handle_setup_symfony(&session).await,
        Commands::Nuke(args) => commands::nuke::handle_nuke(&session, args).await,
        Commands::Aliases => commands::aliases::handle_aliases(&session).await,
    }
}
