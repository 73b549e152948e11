//! vf-dump: checkpoint and archive storage.
//!
//! A run directory holds one rolling `restart` slot, a growing set of
//! time-tagged archives under `intermediate/`, and nothing else this crate
//! cares about. Envelopes are JSON so field state round-trips f64-exact.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::config_hash;
pub use store::{ARCHIVE_DIR, DumpStore, RESTART_FILE, read_header};
pub use types::*;

pub type DumpResult<T> = Result<T, DumpError>;

#[derive(thiserror::Error, Debug)]
pub enum DumpError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No restart slot at {path}")]
    MissingRestart { path: String },

    #[error("Unsupported checkpoint version {found} (newest supported: {supported})")]
    Version { found: u32, supported: u32 },
}
