//! Core types shared by the build, watch and serve paths.

mod category;
mod state;

pub use category::{FileCategory, categorize_path};
pub use state::{is_shutdown, register_server, setup_shutdown_handler};
