//! Content hashing using FxHash.
//!
//! Fast, deterministic, non-cryptographic. Used to detect whether
//! `kiln.toml` actually changed between watch events.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_deterministic() {
        assert_eq!(compute("[serve]\nport = 1"), compute("[serve]\nport = 1"));
        assert_ne!(compute("[serve]\nport = 1"), compute("[serve]\nport = 2"));
    }
}
