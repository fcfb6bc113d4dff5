//! # devstack Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces used by every command handler:
//!
//! - `config`: the `projects.yml` registry and `stack:` settings
//! - `env_file`: `.env` parsing
//! - `error`: the error taxonomy and `Result` alias
//! - `placeholder`: detection of unfilled template values
//! - `session`: the per-invocation context handed to handlers
//!
//! ```rust
//! use crate::core::config;
//! use crate::core::error::{DevstackError, Result};
//! use crate::core::session::Session;
//! ```
//!
pub mod config;
pub mod env_file;
pub mod error;
pub mod placeholder;
pub mod session;
