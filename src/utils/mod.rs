//! Shared utilities.

pub mod exec;
pub mod hash;
pub mod mime;
pub mod path;
pub mod plural;
pub mod walk;
