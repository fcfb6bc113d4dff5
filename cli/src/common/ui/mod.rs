//! # devstack UI Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Everything the user sees or answers goes through two seams defined here:
//!
//! - [`Reporter`]: the status line sink (`+ success`, `x error`, `* info`,
//!   `! warning`, section headers, plain lines). [`ConsoleReporter`] prints
//!   colored lines to the terminal.
//! - [`Prompter`]: y/N confirmations and free-text answers. [`TerminalPrompter`]
//!   asks through `dialoguer`.
//!
//! Handlers receive both through the [`Session`](crate::core::session::Session)
//! rather than printing directly, so tests can swap in the recording and
//! scripted implementations from [`testing`].
//!
use crate::core::error::Result;

/// Dialoguer-backed prompter.
pub mod prompts;
/// Colored terminal reporter.
pub mod reporter;

pub use prompts::TerminalPrompter;
pub use reporter::ConsoleReporter;

/// Sink for user-facing status output.
pub trait Reporter {
    fn success(&self, msg: &str);
    fn error(&self, msg: &str);
    fn info(&self, msg: &str);
    fn warning(&self, msg: &str);
    /// A boxed section title printed at the start of each command.
    fn header(&self, title: &str);
    /// An undecorated line (lists, command hints).
    fn plain(&self, line: &str);
}

/// Source of answers to interactive questions.
pub trait Prompter {
    /// Asks a yes/no question defaulting to "no".
    fn confirm(&self, prompt: &str) -> Result<bool>;
    /// Asks for a line of text; an empty answer is allowed.
    fn input(&self, prompt: &str) -> Result<String>;
}
