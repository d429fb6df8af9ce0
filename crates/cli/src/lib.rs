//! Library interface for the moulinette CLI
//!
//! This module exposes the command implementations for integration testing
//! while keeping argument parsing and logging setup in main.rs.

pub mod commands;

// Re-export commonly needed types for tests
pub use anyhow::Result;
pub use commands::{run_answers, run_evaluate, run_validate};
pub use moulinette_core::config::Config;
