//! Checkpoint envelope types.

use serde::{Deserialize, Serialize};

/// Current envelope format version.
pub const CHECKPOINT_VERSION: u32 = 1;

/// Complete dump of a run at one instant: loop bookkeeping plus the
/// solver's whole grid-and-fields state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint<T> {
    pub version: u32,
    /// Simulation time of the dump.
    pub time: f64,
    /// Steps executed up to the dump.
    pub step: u64,
    /// Last timestep taken before the dump.
    pub dt: f64,
    /// sha-256 of the configuration that produced the run.
    pub config_hash: String,
    /// RFC 3339 wall-clock creation time.
    pub created_at: String,
    pub state: T,
}

impl<T> Checkpoint<T> {
    pub fn new(time: f64, step: u64, dt: f64, config_hash: String, state: T) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            time,
            step,
            dt,
            config_hash,
            created_at: chrono::Utc::now().to_rfc3339(),
            state,
        }
    }
}

/// Envelope metadata without the solver payload. serde skips the `state`
/// field on deserialization, so headers read cheaply from any dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointHeader {
    pub version: u32,
    pub time: f64,
    pub step: u64,
    pub dt: f64,
    pub config_hash: String,
    pub created_at: String,
}
