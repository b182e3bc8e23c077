//! Climatrack command-line interface
//!
//! Argument definitions, command handlers and text rendering for the
//! `climatrack` binary.

pub mod cli;
pub mod commands;
pub mod render;

pub use cli::{Cli, Commands, log_filter_from_verbosity};
pub use commands::App;
