//! # Tool Lookup
//!
//! File: cli/src/common/system/tools.rs
//!
use crate::common::process::{quote, CommandRunner};
use tracing::debug;

/// Whether `name` resolves through `command -v`.
pub async fn is_on_path<R: CommandRunner>(runner: &R, name: &str) -> bool {
    let Ok(quoted) = quote(name) else {
        return false;
    };
    let found = runner
        .capture(&format!("command -v {}", quoted), None)
        .await
        .is_some();
    debug!("Tool '{}' on PATH: {}", name, found);
    found
}
