//! Content-based configuration hashing.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex sha-256 of a value's JSON form.
///
/// Stamped into every checkpoint so a restore can tell whether the dump
/// came from the same configuration it is resuming under.
pub fn config_hash<T: Serialize>(value: &T) -> String {
    let mut hasher = Sha256::new();
    let json = serde_json::to_string(value).unwrap_or_default();
    hasher.update(json.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}
