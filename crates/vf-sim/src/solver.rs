//! FlowSolver trait: the boundary to the external PDE solver.
//!
//! Everything the control core needs from the solver library fits in one
//! trait: step the coupled system, refresh curvature, run one combined
//! refine/coarsen pass, expose per-cell samples for the energy reduction,
//! and move whole grid states in and out for checkpointing. The numerics
//! behind these calls (VOF transport, projection, log-conformation) are
//! not this crate's business.

use nalgebra::{Point3, Vector3};
use serde::Serialize;
use serde::de::DeserializeOwned;

use vf_core::PhaseCoefficients;

use crate::error::SimResult;

/// Fields the refinement controller can track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedField {
    VolumeFraction,
    Curvature,
    VelocityX,
    VelocityY,
    VelocityZ,
}

/// One field/tolerance pair for the wavelet error estimate.
///
/// The association is fixed for the whole run; a criterion list is built
/// once and never reordered. `needs_third_axis` gates the criterion to
/// runs that actually carry a third velocity component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Criterion {
    pub field: TrackedField,
    pub tolerance: f64,
    pub needs_third_axis: bool,
}

/// What one adapt pass did to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdaptReport {
    pub refined: usize,
    pub coarsened: usize,
    /// Deepest level present anywhere after the pass.
    pub deepest_level: u8,
}

/// Per-cell view used by the energy reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSample {
    /// Liquid volume fraction, nominally in [0, 1].
    pub fraction: f64,
    /// Cell-centered velocity; the z component is zero outside 3-D runs.
    pub velocity: Vector3<f64>,
    /// Cell edge length.
    pub delta: f64,
    /// Distance of the cell center from the symmetry axis. Only read in
    /// axisymmetric runs.
    pub radius: f64,
}

/// External incompressible two-phase solver with adaptive grid support.
pub trait FlowSolver {
    /// Complete serializable grid-and-fields state.
    type State: Serialize + DeserializeOwned;

    /// Install the per-phase coefficients. Called once before stepping.
    fn apply_coefficients(&mut self, coefficients: &PhaseCoefficients) -> SimResult<()>;

    /// Refine every cell whose center lies within `half_width` of the
    /// interface (|shape| < half_width) until it reaches `max_level`.
    fn refine_interface_band(
        &mut self,
        shape: &dyn Fn(Point3<f64>) -> f64,
        half_width: f64,
        max_level: u8,
    ) -> SimResult<()>;

    /// Fill the volume-fraction field from a signed shape function
    /// (positive inside the liquid).
    fn init_volume_fraction(&mut self, shape: &dyn Fn(Point3<f64>) -> f64) -> SimResult<()>;

    /// Set the velocity field pointwise. `fraction` is the local liquid
    /// fraction left by `init_volume_fraction`.
    fn init_velocity(
        &mut self,
        velocity: &dyn Fn(Point3<f64>, f64) -> Vector3<f64>,
    ) -> SimResult<()>;

    /// Advance the coupled system by one step no longer than `dt_limit`.
    /// Returns the timestep actually taken.
    fn advance(&mut self, dt_limit: f64) -> SimResult<f64>;

    /// Recompute the interface curvature field from the volume fraction.
    fn update_curvature(&mut self) -> SimResult<()>;

    /// One atomic refine/coarsen pass over all criteria. A cell refines
    /// (up to `max_level`) when any field's estimated error exceeds its
    /// tolerance and coarsens (down to `min_level`) only when every field
    /// stays within tolerance.
    fn adapt(
        &mut self,
        criteria: &[Criterion],
        max_level: u8,
        min_level: u8,
    ) -> SimResult<AdaptReport>;

    /// Sample every active cell in a fixed deterministic order. Clears
    /// and refills `out` so the buffer can be reused across steps.
    fn sample_cells(&self, out: &mut Vec<CellSample>);

    fn export_state(&self) -> SimResult<Self::State>;

    fn import_state(&mut self, state: Self::State) -> SimResult<()>;
}
