//! # Shell Detection
//!
//! File: cli/src/common/system/shell.rs
//!
//! Resolves the rc file that should source `~/.bash_aliases`. Only bash and zsh
//! are recognised; anything else is treated as bash.
//!
use std::env;
use std::path::{Path, PathBuf};

/// Shells whose rc files we know how to extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    Bash,
    Zsh,
}

impl ShellKind {
    /// Classifies a `$SHELL` value such as `/usr/bin/zsh`.
    pub fn from_shell_path(shell_path: &str) -> Self {
        if shell_path.ends_with("zsh") {
            ShellKind::Zsh
        } else {
            if !shell_path.ends_with("bash") {
                tracing::warn!(
                    "Unsupported shell detected: {}, defaulting to bash.",
                    shell_path
                );
            }
            ShellKind::Bash
        }
    }

    pub fn rc_filename(self) -> &'static str {
        match self {
            ShellKind::Bash => ".bashrc",
            ShellKind::Zsh => ".zshrc",
        }
    }
}

/// Detects the user's shell from `$SHELL`.
pub fn detect_shell() -> ShellKind {
    env::var("SHELL").map_or_else(
        |_| {
            tracing::warn!("Could not detect SHELL env var, defaulting to bash.");
            ShellKind::Bash
        },
        |shell_path| ShellKind::from_shell_path(&shell_path),
    )
}

/// The rc file for `shell` under `home`.
pub fn get_rc_path(home: &Path, shell: ShellKind) -> PathBuf {
    home.join(shell.rc_filename())
}
