//! # Terminal Prompts
//!
//! File: cli/src/common/ui/prompts.rs
//!
//! `dialoguer`-backed implementation of [`Prompter`]. Confirmations default to
//! "no", so pressing Enter never approves a destructive action.
//!
//! When stdin is not a terminal (`echo y | dev down`), answers are read one line
//! at a time from stdin instead; end of input counts as an empty answer.
//!
use super::Prompter;
use crate::core::error::Result;
use anyhow::Context;
use dialoguer::{Confirm, Input};
use std::io::{self, BufRead, IsTerminal, Write};

/// Asks questions on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        if !io::stdin().is_terminal() {
            let answer = ask_piped(&format!("{} [y/N]", prompt))?;
            return Ok(is_yes(&answer));
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .with_context(|| format!("Failed to read answer to '{}'", prompt))
    }

    fn input(&self, prompt: &str) -> Result<String> {
        if !io::stdin().is_terminal() {
            return ask_piped(prompt);
        }
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("Failed to read answer to '{}'", prompt))?;
        Ok(answer.trim().to_string())
    }
}

fn ask_piped(prompt: &str) -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{}: ", prompt)?;
    stdout.flush()?;
    read_answer(&mut io::stdin().lock())
        .with_context(|| format!("Failed to read answer to '{}'", prompt))
}

/// Reads one trimmed line; end of input is an empty answer.
fn read_answer(reader: &mut impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}
