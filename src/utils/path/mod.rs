//! Path utilities.
//!
//! Pure functions for path manipulation, no side effects except
//! `normalize_path`'s canonicalize attempt.

mod fs;

pub use fs::{clean, normalize_path, to_slash};
