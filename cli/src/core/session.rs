//! # devstack Command Session
//!
//! File: cli/src/core/session.rs
//!
//! ## Overview
//!
//! A [`Session`] is everything a command handler needs for one invocation of
//! `dev`: the project root, the detected compose front-end, the command runner,
//! the reporter and prompter, and the `stack:` settings. It is built once in
//! `main` after preflight and passed by reference to exactly one handler.
//!
//! Handlers are generic over the runner (`Session<R: CommandRunner>`) so unit
//! tests can drive them with a recording fake and never touch Docker.
//!
use crate::common::docker::Compose;
use crate::common::process::CommandRunner;
use crate::common::ui::{Prompter, Reporter};
use crate::core::config::{self, StackSettings};
use crate::core::env_file::{self, EnvMap, ENV_FILENAME};
use crate::core::error::{DevstackError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Per-invocation context shared by all command handlers.
pub struct Session<R: CommandRunner> {
    root: PathBuf,
    compose: Compose,
    runner: R,
    reporter: Box<dyn Reporter>,
    prompter: Box<dyn Prompter>,
    settings: StackSettings,
}

impl<R: CommandRunner> Session<R> {
    /// Builds a session, reading `stack:` settings from `<root>/projects.yml`.
    pub fn new(
        root: PathBuf,
        compose: Compose,
        runner: R,
        reporter: Box<dyn Reporter>,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        let settings = config::load_stack_settings(&root, reporter.as_ref());
        debug!("Session root: {}, compose: {}", root.display(), compose.program());
        Self {
            root,
            compose,
            runner,
            reporter,
            prompter,
            settings,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn compose(&self) -> &Compose {
        &self.compose
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn reporter(&self) -> &dyn Reporter {
        self.reporter.as_ref()
    }

    pub fn prompter(&self) -> &dyn Prompter {
        self.prompter.as_ref()
    }

    pub fn settings(&self) -> &StackSettings {
        &self.settings
    }

    pub fn env_path(&self) -> PathBuf {
        self.root.join(ENV_FILENAME)
    }

    /// Parses `<root>/.env` fresh; a missing file is an empty map.
    pub fn load_env(&self) -> EnvMap {
        env_file::load_env_file(&self.env_path(), self.reporter())
    }

    /// Runs `<compose> <args>` in the project root; `true` on exit status zero.
    pub async fn compose_run(&self, args: &str) -> bool {
        self.runner
            .run(&self.compose.cmd(args), Some(&self.root))
            .await
    }

    /// Like [`compose_run`](Self::compose_run), but a failure is an error
    /// naming `context`.
    pub async fn compose_checked(&self, args: &str, context: &str) -> Result<()> {
        let command = self.compose.cmd(args);
        if self.runner.run(&command, Some(&self.root)).await {
            Ok(())
        } else {
            Err(DevstackError::ExternalCommand {
                context: context.to_string(),
                cmd: command,
            }
            .into())
        }
    }

    /// Prints the configured service URLs.
    pub fn print_urls(&self) {
        if self.settings.urls.is_empty() {
            return;
        }
        self.reporter.info("Access your application:");
        for url in &self.settings.urls {
            self.reporter
                .plain(&format!("  * {}: {}", url.label, url.url));
        }
    }
}
