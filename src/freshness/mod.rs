//! Output freshness checks, so unchanged sources are not reprocessed.

mod mtime;

pub use mtime::{get_mtime, is_output_fresh};
