//! # devstack Nuke Command
//!
//! File: cli/src/commands/nuke.rs
//!
//! `dev nuke [--force]` removes everything Docker holds for this stack:
//! containers, volumes (database data included), the stack's images, the build
//! cache and dangling resources. Project source directories are not touched.
//!
//! Every stage is best effort; a stage that fails is reported and the next one
//! still runs. Without `--force` the user must type `NUKE` to proceed.
//!
use crate::common::process::{quote, CommandRunner};
use crate::core::error::Result;
use crate::core::session::Session;
use clap::Parser;
use tracing::{debug, info};

const CONFIRMATION_WORD: &str = "NUKE";

#[derive(Parser, Debug)]
#[command(about = "Remove all containers, volumes, images and build cache for the stack")]
pub struct NukeArgs {
    /// Skip the typed confirmation.
    #[arg(short, long)]
    pub force: bool,
}

pub async fn handle_nuke<R: CommandRunner>(session: &Session<R>, args: NukeArgs) -> Result<()> {
    info!("Handling nuke command (force: {})...", args.force);
    let reporter = session.reporter();
    let runner = session.runner();
    let root = session.root();
    reporter.header("[!] NUCLEAR OPTION - Complete Docker Reset [!]");

    if !args.force {
        reporter.warning("This will completely remove:");
        reporter.plain("  * All project containers (running and stopped)");
        reporter.plain("  * All project images");
        reporter.plain("  * All project volumes (INCLUDING DATABASE DATA)");
        reporter.plain("  * All build cache");
        reporter.warning("Your project code will NOT be deleted, but ALL database data will be lost.");
        reporter.warning("This action CANNOT be undone!");
        let answer = session
            .prompter()
            .input(&format!("Type '{}' in capitals to confirm", CONFIRMATION_WORD))?;
        if answer.trim() != CONFIRMATION_WORD {
            reporter.info("Nuke cancelled");
            return Ok(());
        }
    }

    reporter.info("[1/5] Stopping and removing containers...");
    if session.compose_run("down").await {
        reporter.success("Containers stopped and removed");
    } else {
        reporter.warning("Failed to stop containers (they may not exist)");
    }

    reporter.info("[2/5] Removing volumes...");
    if session.compose_run("down -v").await {
        reporter.success("Volumes removed");
    } else {
        reporter.warning("Failed to remove volumes (they may not exist)");
    }

    reporter.info("[3/5] Removing images...");
    let images = runner
        .capture(&session.compose().cmd("config --images"), Some(root))
        .await
        .unwrap_or_default();
    let images: Vec<&str> = images
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if images.is_empty() {
        reporter.info("No images to remove");
    } else {
        for image in &images {
            let command = format!("docker rmi --force {}", quote(image)?);
            if !runner.run(&command, None).await {
                debug!("Could not remove image '{}'", image);
            }
        }
        reporter.success("Images removed");
    }

    reporter.info("[4/5] Pruning build cache...");
    if runner.run("docker builder prune -af", None).await {
        reporter.success("Build cache pruned");
    } else {
        reporter.warning("Failed to prune build cache");
    }

    reporter.info("[5/5] Cleaning up orphaned resources...");
    if runner.run("docker system prune -f", None).await {
        reporter.success("Orphaned resources cleaned");
    } else {
        reporter.warning("Failed to clean up orphaned resources");
    }

    reporter.header("*** Nuclear Cleanup Complete! ***");
    reporter.info("To rebuild your environment:");
    reporter.plain("  * dev init          - Full initialization");
    reporter.plain("  * dev up --build    - Start with rebuild");
    Ok(())
}
