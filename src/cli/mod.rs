//! CLI interface for daho
//!
//! Loads pattern files and runs counting requests from the command line.

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};
