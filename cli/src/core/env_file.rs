//! # devstack Environment File Reader
//!
//! File: cli/src/core/env_file.rs
//!
//! ## Overview
//!
//! Parses the stack's `.env` file into an [`EnvMap`]. The format is the simple
//! line-oriented `KEY=VALUE` dialect the compose stack uses:
//!
//! - blank lines and lines starting with `#` are skipped;
//! - a line containing `=` is split on the *first* `=`; key and value are trimmed;
//! - a value wholly wrapped in matching single or double quotes loses the quotes;
//! - lines without `=` are ignored;
//! - a repeated key overwrites the earlier value.
//!
//! A missing file yields an empty map. An I/O error part-way through is reported
//! as a warning and whatever was parsed so far is returned; reading `.env` is
//! never fatal.
//!
//! The map is built fresh for each command invocation and never cached.
//!
use crate::common::ui::Reporter;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Variable name -> value, as read from an environment file.
pub type EnvMap = HashMap<String, String>;

/// Name of the environment file inside the project root.
pub const ENV_FILENAME: &str = ".env";
/// Name of the template copied into place by `dev init`.
pub const ENV_TEMPLATE_FILENAME: &str = ".env.example";

/// Reads and parses the environment file at `path`.
///
/// Missing file -> empty map. Read errors are reported through `reporter` as a
/// warning and the partial result is returned.
pub fn load_env_file(path: &Path, reporter: &dyn Reporter) -> EnvMap {
    let mut vars = EnvMap::new();
    if !path.exists() {
        debug!("No environment file at {}", path.display());
        return vars;
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            reporter.warning(&format!("Error reading {}: {}", path.display(), e));
            return vars;
        }
    };

    for line in BufReader::new(file).lines() {
        match line {
            Ok(line) => {
                if let Some((key, value)) = parse_line(&line) {
                    vars.insert(key, value);
                }
            }
            Err(e) => {
                reporter.warning(&format!("Error reading {}: {}", path.display(), e));
                break;
            }
        }
    }
    debug!("Loaded {} variable(s) from {}", vars.len(), path.display());
    vars
}

/// Parses environment file content held in memory.
pub fn parse_env_str(content: &str) -> EnvMap {
    content.lines().filter_map(parse_line).collect()
}

/// Parses a single line; `None` for blanks, comments and lines without `=`.
fn parse_line(raw: &str) -> Option<(String, String)> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    Some((key.trim().to_string(), strip_quotes(value.trim()).to_string()))
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
