//! Error types for simulation control.

use thiserror::Error;

/// Errors encountered while driving a run.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Solver error: {message}")]
    Solver { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] vf_core::ConfigError),

    #[error("Dump error: {0}")]
    Dump(#[from] vf_dump::DumpError),
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    /// Wrap a failure reported by the external solver backend.
    pub fn solver(message: impl Into<String>) -> Self {
        SimError::Solver {
            message: message.into(),
        }
    }
}
