//! # devstack Tool Pass-Through Commands
//!
//! File: cli/src/commands/exec.rs
//!
//! ## Overview
//!
//! `dev composer`, `dev symfony` and `dev npm` forward their arguments to a tool
//! inside the matching container:
//!
//! - `dev composer require foo/bar` → `docker exec -it <php> composer require foo/bar`
//! - `dev symfony cache:clear` → `docker exec -it <php> php bin/console cache:clear`
//! - `dev npm run dev` → `docker exec -it <node> npm run dev`
//!
//! Arguments are shell-quoted, so values with spaces survive intact. `-i` is
//! used instead of `-it` when stdin is not a terminal.
//!
use crate::common::docker::interaction;
use crate::common::process::{quote_args, CommandRunner};
use crate::core::error::{DevstackError, Result};
use crate::core::session::Session;
use clap::Parser;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(about = "Run a tool inside its container")]
pub struct ExecArgs {
    /// Arguments passed to the tool unchanged.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// A tool reachable through `dev <tool> ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Composer,
    Symfony,
    Npm,
}

impl Tool {
    fn title(self) -> &'static str {
        match self {
            Tool::Composer => "Running Composer",
            Tool::Symfony => "Running Symfony Console",
            Tool::Npm => "Running NPM",
        }
    }

    /// Program (and fixed leading arguments) inside the container.
    fn program(self) -> &'static str {
        match self {
            Tool::Composer => "composer",
            Tool::Symfony => "php bin/console",
            Tool::Npm => "npm",
        }
    }

    fn example(self) -> &'static str {
        match self {
            Tool::Composer => "dev composer install",
            Tool::Symfony => "dev symfony cache:clear",
            Tool::Npm => "dev npm install",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Tool::Composer => "composer",
            Tool::Symfony => "Symfony",
            Tool::Npm => "NPM",
        }
    }
}

pub async fn handle_exec<R: CommandRunner>(
    session: &Session<R>,
    tool: Tool,
    args: ExecArgs,
) -> Result<()> {
    info!("Handling {:?} command...", tool);
    debug!("Forwarded args: {:?}", args.args);
    let reporter = session.reporter();
    reporter.header(tool.title());

    if args.args.is_empty() {
        reporter.info(&format!("Example: {}", tool.example()));
        anyhow::bail!("No {} command specified", tool.label());
    }

    let settings = session.settings();
    let container = match tool {
        Tool::Composer | Tool::Symfony => &settings.php_container,
        Tool::Npm => &settings.node_container,
    };
    let invocation = format!("{} {}", tool.program(), quote_args(&args.args)?);
    let command = interaction::exec_command(interaction::tty_flags(), container, &invocation)?;
    reporter.info(&format!("Running: {}", command));

    if session.runner().run(&command, Some(session.root())).await {
        Ok(())
    } else {
        Err(DevstackError::ExternalCommand {
            context: tool.program().to_string(),
            cmd: command,
        }
        .into())
    }
}
