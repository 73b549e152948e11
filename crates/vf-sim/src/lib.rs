//! Simulation control core for adaptive two-phase viscoelastic flow.
//!
//! Provides:
//! - FlowSolver trait boundary to the external PDE solver
//! - Scenario-driven initialization with checkpoint restore
//! - Per-step multi-field refinement control with a level ceiling
//! - Rolling restart slot + permanent time-tagged archives
//! - Kinetic-energy monitoring with divergence detection
//! - The fixed-order step loop tying it all together

pub mod adapt;
pub mod energy;
pub mod error;
pub mod init;
pub mod monitor;
pub mod scenario;
pub mod schedule;
pub mod sim;
pub mod snapshot;
pub mod solver;

// Re-exports for public API
pub use adapt::{MIN_LEVEL, RefinementController, refinement_criteria};
pub use energy::kinetic_energy;
pub use error::{SimError, SimResult};
pub use init::{InitReport, StartMode, initialize};
pub use monitor::{
    DIAGNOSTIC_LOG_FILE, RUN_LOG_FILE, StabilityMonitor, StopReason, Verdict,
};
pub use scenario::{PerturbedFilament, Scenario, SphericalDrop};
pub use schedule::IntervalTrigger;
pub use sim::{RunOutcome, RunReport, RunState, run_sim};
pub use snapshot::SnapshotManager;
pub use solver::{AdaptReport, CellSample, Criterion, FlowSolver, TrackedField};
