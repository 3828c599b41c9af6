//! Command-line interface module.

mod args;
pub mod build;
pub mod init;
pub mod prune;
pub mod serve;

pub use args::{Cli, Commands};
