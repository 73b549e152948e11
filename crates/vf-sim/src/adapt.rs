//! Per-step refinement control.
//!
//! Every step, after the solver advance: refresh the curvature field,
//! then issue one combined adapt call over the tracked fields. Cells
//! refine when any field's wavelet error estimate exceeds its tolerance
//! and coarsen only when all of them fit, bounded above by the configured
//! ceiling and below by a fixed floor.

use vf_core::{Geometry, SimulationConfig};

use crate::error::{SimError, SimResult};
use crate::solver::{AdaptReport, Criterion, FlowSolver, TrackedField};

/// Coarsening floor passed to every adapt call. Grids never coarsen below
/// this level no matter how smooth the fields are.
pub const MIN_LEVEL: u8 = 4;

/// Build the tracked-field list for a run.
///
/// Fixed order: volume fraction, curvature, then velocity components.
/// Order carries no meaning, but each tolerance stays paired with its
/// field for the whole run.
pub fn refinement_criteria(config: &SimulationConfig) -> Vec<Criterion> {
    vec![
        Criterion {
            field: TrackedField::VolumeFraction,
            tolerance: config.fraction_tol,
            needs_third_axis: false,
        },
        Criterion {
            field: TrackedField::Curvature,
            tolerance: config.curvature_tol,
            needs_third_axis: false,
        },
        Criterion {
            field: TrackedField::VelocityX,
            tolerance: config.velocity_tol,
            needs_third_axis: false,
        },
        Criterion {
            field: TrackedField::VelocityY,
            tolerance: config.velocity_tol,
            needs_third_axis: false,
        },
        Criterion {
            field: TrackedField::VelocityZ,
            tolerance: config.velocity_tol,
            needs_third_axis: true,
        },
    ]
}

/// Drives the refine/coarsen cycle with a fixed criteria set.
pub struct RefinementController {
    active: Vec<Criterion>,
    max_level: u8,
}

impl RefinementController {
    pub fn new(config: &SimulationConfig) -> Self {
        let three_d = config.geometry == Geometry::ThreeDimensional;
        let active = refinement_criteria(config)
            .into_iter()
            .filter(|criterion| three_d || !criterion.needs_third_axis)
            .collect();
        Self {
            active,
            max_level: config.max_level,
        }
    }

    /// Criteria actually issued to the solver for this geometry.
    pub fn criteria(&self) -> &[Criterion] {
        &self.active
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    /// Curvature refresh plus one atomic adapt pass.
    ///
    /// Curvature is recomputed first, every step: the criteria read it,
    /// and the field is only as fresh as the last explicit update.
    pub fn apply<S: FlowSolver>(&self, solver: &mut S) -> SimResult<AdaptReport> {
        solver.update_curvature()?;
        let report = solver.adapt(&self.active, self.max_level, MIN_LEVEL)?;
        if report.deepest_level > self.max_level {
            return Err(SimError::solver(format!(
                "adapt produced level {} above the ceiling {}",
                report.deepest_level, self.max_level
            )));
        }
        Ok(report)
    }
}
