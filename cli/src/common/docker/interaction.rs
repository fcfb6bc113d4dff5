//! # Container Interaction Commands
//!
//! File: cli/src/common/docker/interaction.rs
//!
//! Builders for the `docker exec` and `docker run` command lines used to reach
//! into containers. Everything user- or config-supplied is quoted.
//!
use crate::common::process::quote;
use crate::core::error::Result;
use std::io::IsTerminal;
use std::path::Path;

/// `-it` when stdin is a terminal, `-i` otherwise (e.g. piped input in CI).
pub fn tty_flags() -> &'static str {
    if std::io::stdin().is_terminal() {
        "-it"
    } else {
        "-i"
    }
}

/// `docker exec <flags> <container> <program> <args>`.
///
/// `program_and_args` is inserted verbatim; callers quote user input.
pub fn exec_command(flags: &str, container: &str, program_and_args: &str) -> Result<String> {
    let flags = flags.trim();
    let mut command = String::from("docker exec");
    if !flags.is_empty() {
        command.push(' ');
        command.push_str(flags);
    }
    command.push(' ');
    command.push_str(&quote(container)?);
    command.push(' ');
    command.push_str(program_and_args.trim());
    Ok(command)
}

/// Runs one setup step string through `sh -c` inside `container`, non-interactively.
pub fn step_command(container: &str, step: &str) -> Result<String> {
    exec_command("", container, &format!("sh -c {}", quote(step)?))
}

/// A throwaway container that deletes `<mount>/<subdir>` as root.
///
/// Used when files written by a container (owned by another uid) block a host
/// side removal. Only the subdirectory is removed; the mount point stays.
pub fn removal_command(image: &str, mount: &Path, subdir: &str) -> Result<String> {
    let volume = format!("{}:/target", mount.display());
    let target = format!("/target/{}", subdir);
    Ok(format!(
        "docker run --rm -v {} {} rm -rf {}",
        quote(&volume)?,
        quote(image)?,
        quote(&target)?
    ))
}
