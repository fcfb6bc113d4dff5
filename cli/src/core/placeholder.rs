//! # devstack Placeholder Detection
//!
//! File: cli/src/core/placeholder.rs
//!
//! Decides whether a configuration value is an unfilled template placeholder
//! (copied verbatim from `.env.example`) that must be asked for interactively
//! instead of trusted.
//!

/// Substrings that mark a value as never filled in. Matched case-insensitively.
pub const PLACEHOLDER_MARKERS: &[&str] = &[
    "yourusername",
    "your-username",
    "placeholder",
    "example.com",
    "changeme",
    "change-me",
];

/// Returns `true` if `value` is empty or contains any [`PLACEHOLDER_MARKERS`] entry.
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return true;
    }
    let lowered = value.to_lowercase();
    PLACEHOLDER_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}
