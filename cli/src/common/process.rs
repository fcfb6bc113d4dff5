//! # devstack Process Execution (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Every external program the CLI drives (docker, docker compose, git, the
//! interactive shells inside containers) is started through one narrow port,
//! [`CommandRunner`]. Commands are whole shell command lines, run with `sh -c`
//! (`cmd /C` on Windows), so callers can use quoting and `--format '{{.Names}}'`
//! style arguments directly.
//!
//! ## Modes
//!
//! - **Interactive** (`capture = false`): the child inherits stdin/stdout/stderr,
//!   so `docker exec -it`, `mysql` and `compose logs -f` take over the terminal
//!   until the user leaves them. Result: [`CommandResult::Success`], true iff the
//!   exit status was zero. With `check = true` a non-zero exit is raised as
//!   [`DevstackError::ExternalCommand`] instead.
//! - **Capturing** (`capture = true`): stdout is collected and returned with
//!   trailing whitespace trimmed. With `check = true` a non-zero exit yields
//!   [`CommandResult::Failed`] carrying the trimmed stderr, which callers may
//!   hand to their reporter; with `check = false` stdout is returned whatever
//!   the exit status.
//!
//! A command that cannot be spawned at all is an `Err` in both modes.
//!
//! ## Usage
//!
//! ```rust
//! // Blocking until the user exits the shell:
//! let ok = runner.run("docker exec -it symfony-php bash", Some(root)).await;
//! // Reading output:
//! let names = runner.capture("docker ps --format '{{.Names}}'", None).await;
//! ```
//!
use crate::core::error::{DevstackError, Result};
use anyhow::Context;
use std::path::Path;
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, warn};

/// How a command line should be executed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions<'a> {
    /// Treat a non-zero exit as a failure to raise rather than a value to return.
    pub check: bool,
    /// Collect stdout instead of inheriting the terminal.
    pub capture: bool,
    /// Working directory; the current directory when `None`.
    pub cwd: Option<&'a Path>,
}

impl<'a> RunOptions<'a> {
    pub fn interactive(cwd: Option<&'a Path>) -> Self {
        Self {
            check: false,
            capture: false,
            cwd,
        }
    }

    pub fn captured(cwd: Option<&'a Path>) -> Self {
        Self {
            check: true,
            capture: true,
            cwd,
        }
    }
}

/// Outcome of one command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Interactive mode: whether the exit status was zero.
    Success(bool),
    /// Capture mode: trimmed stdout.
    Captured(Option<String>),
    /// Checked capture mode: the exit status was non-zero. Holds trimmed stderr.
    Failed(String),
}

impl CommandResult {
    pub fn succeeded(&self) -> bool {
        match self {
            CommandResult::Success(ok) => *ok,
            CommandResult::Captured(out) => out.is_some(),
            CommandResult::Failed(_) => false,
        }
    }

    pub fn into_output(self) -> Option<String> {
        match self {
            CommandResult::Success(_) | CommandResult::Failed(_) => None,
            CommandResult::Captured(out) => out,
        }
    }
}

/// The port through which every external command is executed.
///
/// Implementors provide [`execute`](CommandRunner::execute); the convenience
/// methods cover the two call shapes used by command handlers.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn execute(&self, command: &str, opts: RunOptions<'_>) -> Result<CommandResult>;

    /// Runs interactively without raising; `true` iff the exit status was zero.
    /// A spawn failure is logged and reported as `false`.
    async fn run(&self, command: &str, cwd: Option<&Path>) -> bool {
        match self.execute(command, RunOptions::interactive(cwd)).await {
            Ok(result) => result.succeeded(),
            Err(e) => {
                warn!("Could not run '{}': {:#}", command, e);
                false
            }
        }
    }

    /// Captures stdout; `None` when the command fails or cannot be run.
    async fn capture(&self, command: &str, cwd: Option<&Path>) -> Option<String> {
        match self.execute(command, RunOptions::captured(cwd)).await {
            Ok(CommandResult::Failed(stderr)) => {
                debug!("'{}' failed: {}", command, stderr);
                None
            }
            Ok(result) => result.into_output(),
            Err(e) => {
                debug!("Could not capture '{}': {:#}", command, e);
                None
            }
        }
    }

    /// Captures stdout regardless of exit status; `None` only if it could not run.
    async fn capture_lenient(&self, command: &str, cwd: Option<&Path>) -> Option<String> {
        let opts = RunOptions {
            check: false,
            capture: true,
            cwd,
        };
        match self.execute(command, opts).await {
            Ok(result) => result.into_output(),
            Err(e) => {
                debug!("Could not capture '{}': {:#}", command, e);
                None
            }
        }
    }
}

/// Runs command lines through the platform shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ShellRunner {
    fn command(command_line: &str) -> Command {
        let mut command = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C");
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c");
            c
        };
        command.arg(command_line);
        command
    }
}

impl CommandRunner for ShellRunner {
    async fn execute(&self, command_line: &str, opts: RunOptions<'_>) -> Result<CommandResult> {
        debug!(
            "Executing '{}' (check: {}, capture: {}, cwd: {:?})",
            command_line, opts.check, opts.capture, opts.cwd
        );
        let mut command = Self::command(command_line);
        if let Some(dir) = opts.cwd {
            command.current_dir(dir);
        }

        if !opts.capture {
            let status = command
                .status()
                .await
                .with_context(|| format!("Failed to execute '{}'", command_line))?;
            debug!("'{}' exited with {}", command_line, status);
            if opts.check && !status.success() {
                return Err(DevstackError::ExternalCommand {
                    context: "Command".to_string(),
                    cmd: command_line.to_string(),
                }
                .into());
            }
            return Ok(CommandResult::Success(status.success()));
        }

        let output: Output = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("Failed to execute '{}'", command_line))?;
        debug!("'{}' exited with {}", command_line, output.status);

        if opts.check && !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Ok(CommandResult::Failed(stderr.trim().to_string()));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(CommandResult::Captured(Some(stdout.trim_end().to_string())))
    }
}

/// Quotes a single word for inclusion in a generated `sh -c` command line.
pub fn quote(word: &str) -> Result<String> {
    shlex::try_quote(word)
        .map(|q| q.into_owned())
        .with_context(|| format!("Cannot quote argument containing a NUL byte: {:?}", word))
}

/// Quotes and joins user-supplied arguments.
pub fn quote_args<S: AsRef<str>>(args: &[S]) -> Result<String> {
    shlex::try_join(args.iter().map(AsRef::as_ref))
        .context("Cannot quote arguments containing a NUL byte")
}

/// A scripted [`CommandRunner`] that records every command it is asked to run.
#[cfg(test)]
pub mod testing {
    use super::{CommandResult, CommandRunner, RunOptions};
    use crate::core::error::{DevstackError, Result};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::rc::Rc;

    /// What a scripted command does.
    #[derive(Debug, Clone)]
    pub enum Reply {
        /// Exit 0 with no output.
        Ok,
        /// Exit non-zero.
        Fail,
        /// Exit 0 printing this text.
        Output(String),
        /// Exit 0 after deleting this directory, like a container-side `rm -rf`.
        Remove(PathBuf),
    }

    #[derive(Debug)]
    struct Rule {
        pattern: String,
        replies: VecDeque<Reply>,
    }

    /// Commands matching no rule succeed with empty output. Clones share state.
    #[derive(Clone, Default)]
    pub struct FakeRunner {
        rules: Rc<RefCell<Vec<Rule>>>,
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every command containing `pattern` replies with `reply`.
        pub fn on(self, pattern: &str, reply: Reply) -> Self {
            self.on_sequence(pattern, [reply])
        }

        /// Successive matching commands take replies in order; the last one repeats.
        pub fn on_sequence(self, pattern: &str, replies: impl IntoIterator<Item = Reply>) -> Self {
            self.rules.borrow_mut().push(Rule {
                pattern: pattern.to_string(),
                replies: replies.into_iter().collect(),
            });
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        pub fn count(&self, pattern: &str) -> usize {
            self.calls.borrow().iter().filter(|c| c.contains(pattern)).count()
        }

        /// Index of the first recorded command containing `pattern`.
        pub fn position(&self, pattern: &str) -> Option<usize> {
            self.calls.borrow().iter().position(|c| c.contains(pattern))
        }

        fn reply_for(&self, command: &str) -> Reply {
            let mut rules = self.rules.borrow_mut();
            match rules.iter_mut().find(|r| command.contains(&r.pattern)) {
                Some(rule) if rule.replies.len() > 1 => {
                    rule.replies.pop_front().unwrap_or(Reply::Ok)
                }
                Some(rule) => rule.replies.front().cloned().unwrap_or(Reply::Ok),
                None => Reply::Ok,
            }
        }
    }

    impl CommandRunner for FakeRunner {
        async fn execute(&self, command: &str, opts: RunOptions<'_>) -> Result<CommandResult> {
            self.calls.borrow_mut().push(command.to_string());
            let reply = match self.reply_for(command) {
                Reply::Remove(path) => {
                    std::fs::remove_dir_all(&path)?;
                    Reply::Ok
                }
                reply => reply,
            };
            Ok(match (opts.capture, reply) {
                (false, Reply::Fail) if opts.check => {
                    return Err(DevstackError::ExternalCommand {
                        context: "Command".to_string(),
                        cmd: command.to_string(),
                    }
                    .into())
                }
                (false, Reply::Fail) => CommandResult::Success(false),
                (false, _) => CommandResult::Success(true),
                (true, Reply::Fail) if opts.check => CommandResult::Failed(String::new()),
                (true, Reply::Fail) => CommandResult::Captured(Some(String::new())),
                (true, Reply::Ok | Reply::Remove(_)) => {
                    CommandResult::Captured(Some(String::new()))
                }
                (true, Reply::Output(text)) => CommandResult::Captured(Some(text)),
            })
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::testing::{FakeRunner, Reply};
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    #[cfg(unix)]
    async fn test_shell_runner_capture_trims_trailing_whitespace() {
        let out = ShellRunner.capture("printf '  hello \\n\\n'", None).await;
        assert_eq!(out.as_deref(), Some("  hello"));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_shell_runner_capture_failure_modes() {
        assert_eq!(ShellRunner.capture("echo out; exit 3", None).await, None);
        assert_eq!(
            ShellRunner.capture_lenient("echo out; exit 3", None).await.as_deref(),
            Some("out")
        );
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_shell_runner_checked_capture_returns_stderr() {
        let result = ShellRunner
            .execute(
                "echo partial; echo 'no such container' >&2; exit 1",
                RunOptions::captured(None),
            )
            .await
            .unwrap();
        assert_eq!(result, CommandResult::Failed("no such container".to_string()));
        assert!(!result.succeeded());
        assert_eq!(result.into_output(), None);
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_shell_runner_status_and_check() {
        assert!(ShellRunner.run("true", None).await);
        assert!(!ShellRunner.run("exit 1", None).await);

        let checked = RunOptions {
            check: true,
            capture: false,
            cwd: None,
        };
        let err = ShellRunner.execute("exit 1", checked).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DevstackError>(),
            Some(DevstackError::ExternalCommand { .. })
        ));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_shell_runner_honors_cwd() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let listing = ShellRunner.capture("ls", Some(dir.path())).await;
        assert_eq!(listing.as_deref(), Some("marker.txt"));
    }

    #[tokio::test]
    async fn test_fake_runner_sequences_and_records() {
        let runner = FakeRunner::new().on_sequence(
            "inspect",
            [Reply::Output("false".into()), Reply::Output("true".into())],
        );
        assert_eq!(runner.capture("docker inspect a", None).await.as_deref(), Some("false"));
        assert_eq!(runner.capture("docker inspect a", None).await.as_deref(), Some("true"));
        assert_eq!(runner.capture("docker inspect a", None).await.as_deref(), Some("true"));
        assert!(runner.run("docker compose stop", None).await);
        assert_eq!(runner.count("inspect"), 3);
        assert_eq!(runner.position("compose stop"), Some(3));
    }

    #[test]
    fn test_quote_helpers() {
        assert_eq!(quote("plain").unwrap(), "plain");
        assert_eq!(quote("has space").unwrap(), "'has space'");
        assert_eq!(
            quote_args(&["require", "--dev", "symfony/maker bundle"]).unwrap(),
            "require --dev 'symfony/maker bundle'"
        );
        assert!(quote("nul\0byte").is_err());
    }
}
