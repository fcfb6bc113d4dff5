//! # Console Reporter
//!
//! File: cli/src/common/ui/reporter.rs
//!
//! Colored status lines. Errors go to stderr, everything else to stdout.
//! `colored` honors `NO_COLOR` and drops escapes when output is not a terminal.
//!
use super::Reporter;
use colored::Colorize;

const HEADER_WIDTH: usize = 60;

/// Prints status lines to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn success(&self, msg: &str) {
        println!("{}", format!("+ {msg}").green());
    }

    fn error(&self, msg: &str) {
        eprintln!("{}", format!("x {msg}").red());
    }

    fn info(&self, msg: &str) {
        println!("{}", format!("* {msg}").cyan());
    }

    fn warning(&self, msg: &str) {
        println!("{}", format!("! {msg}").yellow());
    }

    fn header(&self, title: &str) {
        let rule = "=".repeat(HEADER_WIDTH);
        println!();
        println!("{}", rule.magenta().bold());
        println!("{}", center(title, HEADER_WIDTH).magenta().bold());
        println!("{}", rule.magenta().bold());
        println!();
    }

    fn plain(&self, line: &str) {
        println!("{line}");
    }
}

fn center(title: &str, width: usize) -> String {
    format!("{title:^width$}")
}
