//! Shared test fixture: an in-memory FlowSolver with controllable
//! dynamics.
//!
//! The grid is a flat list of cells with per-cell levels. Each advance
//! multiplies the velocity field by a constant growth factor, which is
//! enough to drive a run through steady, blow-up and collapse regimes
//! deterministically. Wavelet errors are modeled as |value| * 2^-level so
//! refinement converges the way the real estimator does.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use vf_core::{Geometry, PhaseCoefficients, SimulationConfig, clamp_unit};
use vf_sim::{AdaptReport, CellSample, Criterion, FlowSolver, SimResult, TrackedField};

#[allow(dead_code)]
pub fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

/// Drop-impact-like configuration scaled down for tests.
#[allow(dead_code)]
pub fn test_config(output_dir: PathBuf) -> SimulationConfig {
    SimulationConfig {
        geometry: Geometry::Axisymmetric,
        weber: 1000.0,
        ohnesorge: 1e-2,
        ohnesorge_gas: 1e-4,
        deborah: 0.0,
        elasto_capillary: 0.0,
        density_ratio: 830.0,
        domain_size: 4.0,
        base_level: 4,
        max_level: 6,
        t_end: 1.0,
        snapshot_interval: 0.1,
        dt_max: None,
        fraction_tol: 1e-3,
        curvature_tol: 1e-6,
        velocity_tol: 1e-2,
        energy_ceiling: 1e6,
        energy_floor: 1e-12,
        warmup_steps: 10,
        max_steps: 1_000_000,
        output_dir,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub center: [f64; 3],
    pub level: u8,
    pub fraction: f64,
    pub velocity: [f64; 3],
    pub curvature: f64,
}

/// Serializable dump of the whole synthetic grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticState {
    pub domain: f64,
    pub cells: Vec<Cell>,
}

// Not every test binary reads every counter.
#[allow(dead_code)]
pub struct SyntheticSolver {
    pub domain: f64,
    pub cells: Vec<Cell>,
    /// Timestep the solver would take unconstrained.
    pub dt_nominal: f64,
    /// Velocity multiplier applied on every advance (1.0 = steady).
    pub growth: f64,
    pub coefficients: Option<PhaseCoefficients>,
    pub curvature_updates: usize,
    pub adapt_calls: usize,
    /// Deepest level any adapt pass ever produced.
    pub max_level_seen: u8,
}

#[allow(dead_code)]
impl SyntheticSolver {
    /// Uniform grid at `level` covering (0, domain) x (0, domain).
    pub fn uniform(domain: f64, level: u8, dt_nominal: f64, growth: f64) -> Self {
        let n = 1usize << level;
        let delta = domain / n as f64;
        let mut cells = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                cells.push(Cell {
                    center: [(i as f64 + 0.5) * delta, (j as f64 + 0.5) * delta, 0.0],
                    level,
                    fraction: 0.0,
                    velocity: [0.0; 3],
                    curvature: 0.0,
                });
            }
        }
        Self {
            domain,
            cells,
            dt_nominal,
            growth,
            coefficients: None,
            curvature_updates: 0,
            adapt_calls: 0,
            max_level_seen: level,
        }
    }

    fn delta(&self, cell: &Cell) -> f64 {
        self.domain / (1u64 << cell.level) as f64
    }

    fn field_magnitude(cell: &Cell, field: TrackedField) -> f64 {
        match field {
            TrackedField::VolumeFraction => cell.fraction.abs(),
            TrackedField::Curvature => cell.curvature.abs(),
            TrackedField::VelocityX => cell.velocity[0].abs(),
            TrackedField::VelocityY => cell.velocity[1].abs(),
            TrackedField::VelocityZ => cell.velocity[2].abs(),
        }
    }

    /// Wavelet-style error estimate: halves with every extra level.
    fn wavelet_error(cell: &Cell, field: TrackedField) -> f64 {
        Self::field_magnitude(cell, field) * 0.5_f64.powi(cell.level as i32)
    }
}

impl FlowSolver for SyntheticSolver {
    type State = SyntheticState;

    fn apply_coefficients(&mut self, coefficients: &PhaseCoefficients) -> SimResult<()> {
        self.coefficients = Some(*coefficients);
        Ok(())
    }

    fn refine_interface_band(
        &mut self,
        shape: &dyn Fn(Point3<f64>) -> f64,
        half_width: f64,
        max_level: u8,
    ) -> SimResult<()> {
        for cell in &mut self.cells {
            let p = Point3::new(cell.center[0], cell.center[1], cell.center[2]);
            if shape(p).abs() < half_width {
                cell.level = max_level;
            }
        }
        Ok(())
    }

    fn init_volume_fraction(&mut self, shape: &dyn Fn(Point3<f64>) -> f64) -> SimResult<()> {
        for cell in &mut self.cells {
            let p = Point3::new(cell.center[0], cell.center[1], cell.center[2]);
            cell.fraction = clamp_unit(0.5 + shape(p));
        }
        Ok(())
    }

    fn init_velocity(
        &mut self,
        velocity: &dyn Fn(Point3<f64>, f64) -> Vector3<f64>,
    ) -> SimResult<()> {
        for cell in &mut self.cells {
            let p = Point3::new(cell.center[0], cell.center[1], cell.center[2]);
            let v = velocity(p, cell.fraction);
            cell.velocity = [v.x, v.y, v.z];
        }
        Ok(())
    }

    fn advance(&mut self, dt_limit: f64) -> SimResult<f64> {
        let dt = self.dt_nominal.min(dt_limit);
        for cell in &mut self.cells {
            for component in &mut cell.velocity {
                *component *= self.growth;
            }
        }
        Ok(dt)
    }

    fn update_curvature(&mut self) -> SimResult<()> {
        self.curvature_updates += 1;
        for cell in &mut self.cells {
            // Peaks at the interface, zero in pure cells.
            cell.curvature = 4.0 * cell.fraction * (1.0 - cell.fraction);
        }
        Ok(())
    }

    fn adapt(
        &mut self,
        criteria: &[Criterion],
        max_level: u8,
        min_level: u8,
    ) -> SimResult<AdaptReport> {
        self.adapt_calls += 1;
        let mut report = AdaptReport::default();
        for cell in &mut self.cells {
            let needs_refine = criteria
                .iter()
                .any(|c| Self::wavelet_error(cell, c.field) > c.tolerance);
            if needs_refine && cell.level < max_level {
                cell.level += 1;
                report.refined += 1;
            } else if !needs_refine && cell.level > min_level {
                // Coarsen only if every field would still fit one level up.
                let fits_coarser = criteria.iter().all(|c| {
                    2.0 * Self::wavelet_error(cell, c.field) <= c.tolerance
                });
                if fits_coarser {
                    cell.level -= 1;
                    report.coarsened += 1;
                }
            }
            report.deepest_level = report.deepest_level.max(cell.level);
        }
        self.max_level_seen = self.max_level_seen.max(report.deepest_level);
        Ok(report)
    }

    fn sample_cells(&self, out: &mut Vec<CellSample>) {
        out.clear();
        out.extend(self.cells.iter().map(|cell| CellSample {
            fraction: cell.fraction,
            velocity: Vector3::new(cell.velocity[0], cell.velocity[1], cell.velocity[2]),
            delta: self.delta(cell),
            radius: cell.center[1],
        }));
    }

    fn export_state(&self) -> SimResult<Self::State> {
        Ok(SyntheticState {
            domain: self.domain,
            cells: self.cells.clone(),
        })
    }

    fn import_state(&mut self, state: Self::State) -> SimResult<()> {
        self.domain = state.domain;
        self.cells = state.cells;
        Ok(())
    }
}
