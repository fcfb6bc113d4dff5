//! # devstack CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! Shared helpers for the integration test crates in `cli/tests/`.
//!

#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// An `assert_cmd::Command` for the compiled `dev` binary.
///
/// `DEV_PROJECT_ROOT` and `RUST_LOG` are cleared so the developer's own
/// environment cannot leak into a test, and colors are disabled.
pub fn dev_cmd() -> Command {
    let mut cmd = Command::cargo_bin("dev").expect("Failed to find dev binary for testing");
    cmd.env_remove("DEV_PROJECT_ROOT")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// [`dev_cmd`] with `HOME` and `SHELL` pointed at a sandbox.
pub fn dev_cmd_with_home(home: &Path) -> Command {
    let mut cmd = dev_cmd();
    cmd.env("HOME", home).env("SHELL", "/bin/bash");
    cmd
}
