//! vf-core: stable foundation for viscoflow.
//!
//! Contains:
//! - config (validated simulation configuration + geometry)
//! - params (dimensionless groups -> per-phase coefficients)
//! - numeric (float helpers)
//! - error (shared error types)

pub mod config;
pub mod error;
pub mod numeric;
pub mod params;

// Re-exports: nice ergonomics for downstream crates
pub use config::{Geometry, SimulationConfig, load_yaml, save_yaml};
pub use error::{ConfigError, CoreResult};
pub use numeric::*;
pub use params::{PhaseCoefficients, derive_coefficients};
