//! # devstack Logs Command
//!
//! File: cli/src/commands/logs.rs
//!
//! `dev logs [service] [-f]` runs `compose logs` attached to the terminal.
//! While following, Ctrl+C ends the view cleanly instead of surfacing as an
//! error: the interrupt reaches `compose logs` directly (same process group)
//! and the handler prints a short notice.
//!
use crate::common::process::{quote, CommandRunner};
use crate::core::error::Result;
use crate::core::session::Session;
use clap::Parser;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(about = "View container logs")]
pub struct LogsArgs {
    /// Service to show (all services when omitted).
    pub service: Option<String>,

    /// Follow log output.
    #[arg(short, long)]
    pub follow: bool,
}

/// The `compose logs` command line for `args`.
fn logs_command<R: CommandRunner>(session: &Session<R>, args: &LogsArgs) -> Result<String> {
    let mut compose_args = String::from("logs");
    if args.follow {
        compose_args.push_str(" -f");
    }
    if let Some(service) = args.service.as_deref().filter(|s| !s.is_empty()) {
        compose_args.push(' ');
        compose_args.push_str(&quote(service)?);
    }
    Ok(session.compose().cmd(&compose_args))
}

pub async fn handle_logs<R: CommandRunner>(session: &Session<R>, args: LogsArgs) -> Result<()> {
    info!("Handling logs command...");
    debug!("Logs args: {:?}", args);
    let reporter = session.reporter();
    reporter.header(&format!(
        "Container Logs: {}",
        args.service.as_deref().unwrap_or("All Services")
    ));

    let command = logs_command(session, &args)?;
    reporter.info(&format!("Running: {}", command));
    reporter.info("Press Ctrl+C to exit");

    tokio::select! {
        ok = session.runner().run(&command, Some(session.root())) => {
            debug!("compose logs finished (success: {})", ok);
        }
        _ = tokio::signal::ctrl_c() => {
            reporter.info("Log viewing stopped");
        }
    }
    Ok(())
}
