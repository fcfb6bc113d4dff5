//! # devstack Alias Installation
//!
//! File: cli/src/commands/aliases.rs
//!
//! ## Overview
//!
//! `dev aliases` installs the shell aliases shipped in `<root>/aliases`:
//!
//! 1. The template's placeholder path `/path/to/dev-environment/dev` is replaced
//!    with the path of the running `dev` binary followed by `--root <root>`, so
//!    the aliases drive this stack from any working directory.
//! 2. `~/.bash_aliases` is replaced wholesale with the result. An existing file
//!    is only replaced after confirmation, and a timestamped backup is kept.
//! 3. The user's shell rc file (`~/.bashrc` or `~/.zshrc`) gets a guarded
//!    `source` block unless it already mentions `.bash_aliases`.
//!
//! This is the only command that works without Docker.
//!
use crate::common::fs::io;
use crate::common::process::CommandRunner;
use crate::common::system::shell::{self, ShellKind};
use crate::common::ui::{Prompter, Reporter};
use crate::core::error::{DevstackError, Result};
use crate::core::session::Session;
use anyhow::Context;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

/// Alias template file in the project root.
pub const ALIASES_TEMPLATE: &str = "aliases";
/// Token in the template replaced by the binary's path.
pub const PATH_TOKEN: &str = "/path/to/dev-environment/dev";
const ALIAS_FILE: &str = ".bash_aliases";

const SOURCE_BLOCK: &str = "
# Source bash aliases if file exists
if [ -f ~/.bash_aliases ]; then
    . ~/.bash_aliases
fi
";

/// Whether the alias file was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasOutcome {
    Installed,
    Cancelled,
}

/// Where aliases are installed and what they point at.
#[derive(Debug, Clone, Copy)]
pub struct AliasTarget<'a> {
    pub home: &'a Path,
    pub binary: &'a Path,
    pub shell: ShellKind,
}

pub async fn handle_aliases<R: CommandRunner>(session: &Session<R>) -> Result<()> {
    info!("Handling aliases command...");
    let home = dirs::home_dir().context("Could not find home directory")?;
    let binary = std::env::current_exe().context("Could not resolve the path of this binary")?;
    let target = AliasTarget {
        home: &home,
        binary: &binary,
        shell: shell::detect_shell(),
    };
    install_aliases(
        session.root(),
        target,
        session.reporter(),
        session.prompter(),
    )?;
    Ok(())
}

/// Installs the alias template from `root` for `target`.
pub fn install_aliases(
    root: &Path,
    target: AliasTarget<'_>,
    reporter: &dyn Reporter,
    prompter: &dyn Prompter,
) -> Result<AliasOutcome> {
    reporter.header("Installing Bash Aliases");

    let template_path = root.join(ALIASES_TEMPLATE);
    if !template_path.is_file() {
        reporter.info("Please create the 'aliases' file first");
        return Err(DevstackError::MissingFile {
            path: template_path,
        }
        .into());
    }
    let template = io::read_file_to_string(&template_path)?;
    let invocation = format!(
        "{} --root {}",
        alias_word(target.binary),
        alias_word(root)
    );
    let content = template.replace(PATH_TOKEN, &invocation);

    let alias_path = target.home.join(ALIAS_FILE);
    if alias_path.exists() {
        reporter.warning(&format!("{} already exists", alias_path.display()));
        if !prompter.confirm("Overwrite existing aliases? (a backup is kept)")? {
            reporter.info("Alias installation cancelled");
            return Ok(AliasOutcome::Cancelled);
        }
        let backup = io::backup_file(&alias_path)?;
        reporter.info(&format!("Backed up existing aliases to {}", backup.display()));
    }
    io::write_string_to_file(&alias_path, &content)?;
    reporter.success(&format!("Aliases written to {}", alias_path.display()));

    ensure_sourced(target, reporter)?;

    reporter.success("Aliases installed successfully!");
    reporter.info(&format!(
        "Reload your shell with: source ~/{}",
        target.shell.rc_filename()
    ));
    Ok(AliasOutcome::Installed)
}

/// A path as one word of an alias body. Paths needing quotes get double quotes,
/// which survive inside the single-quoted `alias name='...'` of the template.
fn alias_word(path: &Path) -> String {
    let text = path.to_string_lossy();
    match shlex::try_quote(&text) {
        Ok(Cow::Borrowed(_)) => text.into_owned(),
        _ => format!("\"{}\"", text),
    }
}

fn ensure_sourced(target: AliasTarget<'_>, reporter: &dyn Reporter) -> Result<()> {
    let rc_path = shell::get_rc_path(target.home, target.shell);
    let rc_name = target.shell.rc_filename();
    if !rc_path.exists() {
        reporter.warning(&format!("~/{} not found", rc_name));
        reporter.info("Please ensure your shell sources ~/.bash_aliases");
        return Ok(());
    }
    let rc_content = io::read_file_to_string(&rc_path)?;
    if rc_content.contains(ALIAS_FILE) {
        debug!("{} already references {}", rc_path.display(), ALIAS_FILE);
        reporter.info(&format!("~/{} already sources ~/{}", rc_name, ALIAS_FILE));
        return Ok(());
    }
    io::append_to_file(&rc_path, SOURCE_BLOCK)?;
    reporter.success(&format!("Added source command to ~/{}", rc_name));
    Ok(())
}
